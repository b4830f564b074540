use crate::config::BLOCKED_DOMAINS;
use url::Url;

/// Decides whether a URL may be visited.
///
/// Matching is a plain "host ends with suffix" check. `.gov.uk` blocks
/// `evil.gov.uk` and also `lovgov.uk`-style hosts that happen to share the
/// trailing characters; no public-suffix parsing is attempted.
#[derive(Debug, Clone)]
pub struct SafetyFilter {
    blocked_suffixes: Vec<String>,
}

impl SafetyFilter {
    pub fn new<I, S>(blocked_suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocked_suffixes: blocked_suffixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns false for malformed URLs and for hosts ending in a blocked suffix.
    pub fn is_safe(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let host = parsed.host_str().unwrap_or("");
        !self
            .blocked_suffixes
            .iter()
            .any(|suffix| host.ends_with(suffix.as_str()))
    }
}

impl Default for SafetyFilter {
    fn default() -> Self {
        Self::new(BLOCKED_DOMAINS)
    }
}
