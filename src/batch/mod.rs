//! Batch module: the URLs submitted for one run
//!
//! A [`JobBatch`] is built once from the input file and is read-only
//! afterwards. Its order carries no meaning for processing; it only breaks
//! ties between identical URLs in the final report.

mod reader;

pub use reader::{read_url_list, read_urls_from};

/// Ordered, read-only list of URLs for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobBatch {
    urls: Vec<String>,
}

impl JobBatch {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
