use serde::{Deserialize, Serialize};

/// Outcome of a single page fetch.
///
/// Callers that only care about content use [`FetchOutcome::into_content`],
/// which collapses every non-success case into `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(String),
    /// Scanning was switched off when the fetch was attempted.
    Disabled,
    /// The URL failed the safety filter.
    Blocked,
    /// Transport error, timeout or unreadable body.
    Failed(String),
}

impl FetchOutcome {
    /// An empty body counts as no content.
    pub fn into_content(self) -> Option<String> {
        match self {
            FetchOutcome::Fetched(content) if !content.is_empty() => Some(content),
            _ => None,
        }
    }
}

/// A page the traversal fetched successfully, with the links it kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedPage {
    pub url: String,
    /// Remaining depth at the time the page was fetched.
    pub depth: usize,
    pub content: String,
    pub links: Vec<String>,
}

impl ScannedPage {
    pub fn new(url: String, depth: usize, content: String, links: Vec<String>) -> Self {
        Self {
            url,
            depth,
            content,
            links,
        }
    }
}
