//! HTML metadata inspection for the responsiveness probe
//!
//! A page counts as responsive when any element matching the marker tag
//! selector (usually `meta`) contains the marker token anywhere in its
//! serialized HTML, e.g. `<meta name="viewport" ...>`.

use scraper::{Html, Selector};

/// Compiled marker lookup, built once per run and shared by all workers
#[derive(Debug, Clone)]
pub struct MarkerInspector {
    selector: Selector,
    token: String,
}

impl MarkerInspector {
    /// Compiles the tag selector
    ///
    /// # Returns
    ///
    /// * `Ok(MarkerInspector)` - Ready to scan documents
    /// * `Err(String)` - The tag is not a valid CSS selector
    pub fn new(tag: &str, token: &str) -> Result<Self, String> {
        let selector =
            Selector::parse(tag).map_err(|e| format!("invalid tag selector '{}': {:?}", tag, e))?;

        Ok(Self {
            selector,
            token: token.to_string(),
        })
    }

    /// The token being searched for
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns true if any matching element carries the marker token
    ///
    /// Malformed markup never fails: html5ever recovers what it can, and a
    /// document without matching elements simply yields `false`.
    pub fn contains_marker(&self, html: &str) -> bool {
        let document = Html::parse_document(html);

        document
            .select(&self.selector)
            .any(|element| element.html().contains(&self.token))
    }
}
