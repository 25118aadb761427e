//! Parse an index body into items.

use serde::Deserialize;
use url::Url;

use super::REGION_PARAM;
use crate::item::Item;

/// Why an index body yielded no items.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("index body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request URL {0} has no `mkt` region parameter")]
    MissingRegion(String),
    /// Fails one entry only; the rest of the body is still extracted.
    #[error("index entry url {url:?} cannot be resolved: {source}")]
    BadItemUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Deserialize)]
struct IndexDocument {
    #[serde(default)]
    images: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
struct ImageEntry {
    url: Option<String>,
}

/// Extracts one `Item` per image entry, resolving each `url` against `request_url`.
///
/// Entries without a `url`, or whose `url` cannot be resolved, are skipped.
pub fn extract(body: &[u8], request_url: &Url) -> Result<Vec<Item>, ExtractError> {
    let region = request_url
        .query_pairs()
        .find(|(k, _)| k == REGION_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ExtractError::MissingRegion(request_url.to_string()))?;

    let doc: IndexDocument = serde_json::from_slice(body)?;

    let mut items = Vec::with_capacity(doc.images.len());
    for (idx, entry) in doc.images.into_iter().enumerate() {
        let Some(raw) = entry.url.filter(|u| !u.trim().is_empty()) else {
            tracing::debug!(region = %region, idx, "index entry without url, skipped");
            continue;
        };
        match resolve_entry(request_url, &raw) {
            Ok(source_url) => items.push(Item::new(region.clone(), source_url)),
            Err(e) => {
                tracing::debug!(region = %region, idx, "index entry skipped: {}", e);
            }
        }
    }
    Ok(items)
}

/// Resolves one entry's `url` against the index URL.
pub fn resolve_entry(request_url: &Url, raw: &str) -> Result<Url, ExtractError> {
    request_url
        .join(raw.trim())
        .map_err(|source| ExtractError::BadItemUrl {
            url: raw.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(region: &str) -> Url {
        Url::parse(&format!(
            "https://www.bing.com/HPImageArchive.aspx?format=js&idx=0&n=10&pid=hp&mkt={}",
            region
        ))
        .unwrap()
    }

    #[test]
    fn extract_resolves_relative_url_and_region() {
        let body = br#"{"images":[{"url":"/th?id=OHR.Foo_EN-US1234567890_1920x1080.jpg"}]}"#;
        let items = extract(body, &request("en-us")).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].region, "en-us");
        assert_eq!(
            items[0].source_url.as_str(),
            "https://www.bing.com/th?id=OHR.Foo_EN-US1234567890_1920x1080.jpg"
        );
    }

    #[test]
    fn extract_keeps_absolute_urls_and_ignores_other_fields() {
        let body = br#"{
            "images": [
                {"startdate": "20240101", "url": "https://cdn.example.com/a/OHR.A_DE-DE1_1920x1080.jpg", "copyright": "x"},
                {"url": "/th?id=OHR.B_DE-DE2_1920x1080.jpg"}
            ],
            "tooltips": {"loading": "..."}
        }"#;
        let items = extract(body, &request("de-de")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source_url.host_str(), Some("cdn.example.com"));
        assert_eq!(items[1].source_url.host_str(), Some("www.bing.com"));
        assert!(items.iter().all(|i| i.region == "de-de"));
    }

    #[test]
    fn extract_skips_entries_without_url() {
        let body = br#"{"images":[{"title":"no url"},{"url":""},{"url":"/th?id=OHR.C_FR-FR3_1920x1080.jpg"}]}"#;
        let items = extract(body, &request("fr-fr")).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn unresolvable_entry_is_bad_item_url_and_skipped() {
        let err = resolve_entry(&request("en-us"), "http://[::1").unwrap_err();
        assert!(matches!(err, ExtractError::BadItemUrl { ref url, .. } if url == "http://[::1"));

        let body = br#"{"images":[{"url":"http://[::1"},{"url":"/th?id=OHR.D_EN-US4_1920x1080.jpg"}]}"#;
        let items = extract(body, &request("en-us")).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].source_url.as_str().ends_with("OHR.D_EN-US4_1920x1080.jpg"));
    }

    #[test]
    fn extract_empty_or_missing_images() {
        assert!(extract(br#"{"images":[]}"#, &request("en-gb")).unwrap().is_empty());
        assert!(extract(br#"{}"#, &request("en-gb")).unwrap().is_empty());
    }

    #[test]
    fn extract_malformed_json_is_error() {
        let err = extract(b"<html>nope</html>", &request("en-us")).unwrap_err();
        assert!(matches!(err, ExtractError::Json(_)));
    }

    #[test]
    fn extract_requires_region_param() {
        let url = Url::parse("https://www.bing.com/HPImageArchive.aspx?format=js").unwrap();
        let err = extract(br#"{"images":[]}"#, &url).unwrap_err();
        assert!(matches!(err, ExtractError::MissingRegion(_)));
    }
}
