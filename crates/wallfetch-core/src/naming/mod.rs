//! Canonical local file names for remote images.
//!
//! The image service serves the same picture under several names that differ
//! only in one underscore-delimited token (`OHR.Name_EN-US1234567890_1920x1080.jpg`
//! vs `OHR.Name_DE-DE0987654321_1920x1080.jpg`). Dropping that token collapses
//! every variant onto one file name, which is what the store deduplicates on.

mod sanitize;

use url::Url;

pub use sanitize::{sanitize_file_name, MAX_FILE_NAME_LEN};

/// Query parameter the image service uses to address an image (`/th?id=...`).
const ID_PARAM: &str = "id";

/// Minimum number of `_`-separated tokens a remote name must have.
const MIN_TOKENS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    #[error("no file name in {0}")]
    NoFileName(String),
    #[error("file name {0:?} does not have the `<name>_<variant>_<rest>` layout")]
    UnexpectedLayout(String),
    #[error("file name {0:?} is empty after sanitization")]
    Unusable(String),
}

/// Remote file name: the `id` query parameter if present, else the last path segment.
pub fn remote_file_name(url: &Url) -> Option<String> {
    if let Some((_, id)) = url.query_pairs().find(|(k, v)| k == ID_PARAM && !v.is_empty()) {
        return Some(id.into_owned());
    }
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Removes the second `_`-delimited token: `A_B_C_D` becomes `A_C_D`.
pub fn strip_variant_token(name: &str) -> Result<String, NamingError> {
    let mut tokens: Vec<&str> = name.split('_').collect();
    if tokens.len() < MIN_TOKENS {
        return Err(NamingError::UnexpectedLayout(name.to_string()));
    }
    tokens.remove(1);
    Ok(tokens.join("_"))
}

/// Canonical local file name for `source_url`. Pure: same URL, same name.
pub fn canonical_file_name(source_url: &Url) -> Result<String, NamingError> {
    let raw = remote_file_name(source_url)
        .ok_or_else(|| NamingError::NoFileName(source_url.to_string()))?;
    let stripped = strip_variant_token(&raw)?;
    let safe = sanitize_file_name(&stripped);
    if safe.is_empty() {
        return Err(NamingError::Unusable(stripped));
    }
    Ok(safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn canonical_name_from_id_query() {
        let u = url("https://www.bing.com/th?id=OHR.Foo_EN-US1234567890_1920x1080.jpg");
        assert_eq!(canonical_file_name(&u).unwrap(), "OHR.Foo_1920x1080.jpg");
    }

    #[test]
    fn canonical_name_from_path_segment() {
        let u = url("https://cdn.example.com/az/hprichbg/rb/Lake_ROW1234_1366x768.jpg");
        assert_eq!(canonical_file_name(&u).unwrap(), "Lake_1366x768.jpg");
    }

    #[test]
    fn regional_variants_collapse() {
        let us = url("https://www.bing.com/th?id=OHR.Foo_EN-US1234567890_1920x1080.jpg");
        let de = url("https://www.bing.com/th?id=OHR.Foo_DE-DE0987654321_1920x1080.jpg");
        assert_eq!(
            canonical_file_name(&us).unwrap(),
            canonical_file_name(&de).unwrap()
        );
    }

    #[test]
    fn canonical_name_is_stable() {
        let u = url("https://www.bing.com/th?id=OHR.Bar_JA-JP42_UHD.jpg&rf=LaDigue_UHD.jpg&pid=hp");
        let first = canonical_file_name(&u).unwrap();
        for _ in 0..5 {
            assert_eq!(canonical_file_name(&u).unwrap(), first);
        }
        assert_eq!(first, "OHR.Bar_UHD.jpg");
    }

    #[test]
    fn keeps_tokens_after_the_variant() {
        assert_eq!(strip_variant_token("a_b_c_d.jpg").unwrap(), "a_c_d.jpg");
    }

    #[test]
    fn too_few_tokens_rejected() {
        assert_eq!(
            strip_variant_token("plain.jpg"),
            Err(NamingError::UnexpectedLayout("plain.jpg".to_string()))
        );
        assert!(matches!(
            canonical_file_name(&url("https://example.com/only_two.jpg")),
            Err(NamingError::UnexpectedLayout(_))
        ));
    }

    #[test]
    fn no_file_name_rejected() {
        assert!(matches!(
            canonical_file_name(&url("https://example.com/")),
            Err(NamingError::NoFileName(_))
        ));
    }

    #[test]
    fn traversal_in_id_is_sanitized() {
        let u = url("https://example.com/th?id=../../x_VARIANT_y.jpg");
        let name = canonical_file_name(&u).unwrap();
        assert!(!name.contains('/'));
        assert_eq!(name, "x_y.jpg");
    }
}
