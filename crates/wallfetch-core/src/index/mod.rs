//! Regional image index: request URL construction and item extraction.
//!
//! The index is a JSON document of the form
//! `{"images": [{"url": "/th?id=OHR.Name_EN-US123_1920x1080.jpg", ...}, ...]}`.
//! Each entry's `url` is resolved against the request URL; the region tag is
//! taken back from the request's `mkt` query parameter.

mod parse;

use url::Url;

use crate::item::StartRequest;

pub use parse::{extract, resolve_entry, ExtractError};

/// Query parameter carrying the locale tag.
pub const REGION_PARAM: &str = "mkt";

/// Builds the index URL for one region: `format=js&idx=0&n=<batch>&pid=hp&mkt=<region>`
/// appended to whatever query `template` already carries.
pub fn index_url(template: &str, region: &str, batch_size: u32) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(template)?;
    url.query_pairs_mut()
        .append_pair("format", "js")
        .append_pair("idx", "0")
        .append_pair("n", &batch_size.to_string())
        .append_pair("pid", "hp")
        .append_pair(REGION_PARAM, region);
    Ok(url)
}

/// One `StartRequest` per region, in config order.
pub fn start_requests(
    template: &str,
    regions: &[String],
    batch_size: u32,
) -> Result<Vec<StartRequest>, url::ParseError> {
    regions
        .iter()
        .map(|region| {
            Ok(StartRequest {
                url: index_url(template, region, batch_size)?,
                region: region.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_url_has_region_and_batch() {
        let url = index_url("https://www.bing.com/HPImageArchive.aspx", "en-us", 10).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.bing.com/HPImageArchive.aspx?format=js&idx=0&n=10&pid=hp&mkt=en-us"
        );
    }

    #[test]
    fn index_url_keeps_existing_query() {
        let url = index_url("http://127.0.0.1:8080/index?token=abc", "ja-jp", 3).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("token".to_string(), "abc".to_string()));
        assert!(pairs.contains(&("n".to_string(), "3".to_string())));
        assert!(pairs.contains(&("mkt".to_string(), "ja-jp".to_string())));
    }

    #[test]
    fn index_url_rejects_bad_template() {
        assert!(index_url("no scheme here", "en-us", 1).is_err());
    }

    #[test]
    fn start_requests_one_per_region() {
        let regions = vec!["de-de".to_string(), "zh-cn".to_string()];
        let reqs = start_requests("https://example.com/idx", &regions, 5).unwrap();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].region, "de-de");
        assert_eq!(reqs[1].region, "zh-cn");
        assert!(reqs[1].url.as_str().ends_with("mkt=zh-cn"));
    }
}
