//! Values passed between the scheduler, the extractor and the pipeline.

use url::Url;

/// One index request issued every cycle. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub url: Url,
    pub region: String,
}

/// A discovered image, tagged with the region whose index listed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub region: String,
    pub source_url: Url,
}

impl Item {
    pub fn new(region: impl Into<String>, source_url: Url) -> Self {
        Self {
            region: region.into(),
            source_url,
        }
    }
}
