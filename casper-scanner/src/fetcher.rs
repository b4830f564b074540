use crate::config::ScannerConfig;
use crate::enablement::EnablementSource;
use crate::error::Result;
use crate::result::FetchOutcome;
use crate::safety::SafetyFilter;
use crate::stats::ScanStats;
use reqwest::Client;
use reqwest::redirect::Policy;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Raw transport used by [`PageFetcher`]. Only called once the enablement
/// and safety checks have passed.
pub trait PageSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

const MAX_REDIRECTS: usize = 5;

/// reqwest-backed page source with a fixed per-request timeout.
///
/// Redirects are followed only while the target passes the safety filter.
/// A redirect to a blocked host is not followed; the 3xx response itself
/// becomes the result.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        let filter = SafetyFilter::new(config.blocked_suffixes.iter().cloned());
        let redirect_policy = Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if !filter.is_safe(attempt.url().as_str()) {
                info!(target: "casper::webscan", "Refused redirect to blocked domain: {}", attempt.url());
                attempt.stop()
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .redirect(redirect_policy)
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        debug!("{} answered {}", url, response.status());
        // The body is returned whatever the status code.
        Ok(response.text().await?)
    }
}

/// Applies the enablement gate and the safety filter in front of a
/// [`PageSource`], and turns every failure into a non-content outcome.
pub struct PageFetcher<S> {
    source: S,
    filter: SafetyFilter,
    enablement: Arc<dyn EnablementSource>,
    stats: Arc<ScanStats>,
}

impl<S: PageSource> PageFetcher<S> {
    pub fn new(source: S, filter: SafetyFilter, enablement: Arc<dyn EnablementSource>) -> Self {
        Self {
            source,
            filter,
            enablement,
            stats: Arc::new(ScanStats::new()),
        }
    }

    pub fn filter(&self) -> &SafetyFilter {
        &self.filter
    }

    pub fn stats(&self) -> &Arc<ScanStats> {
        &self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch_page(&self, url: &str) -> FetchOutcome {
        if !self.enablement.is_enabled() {
            self.stats.record_disabled();
            return FetchOutcome::Disabled;
        }

        if !self.filter.is_safe(url) {
            info!(target: "casper::webscan", "Skipped blocked domain: {}", url);
            self.stats.record_blocked();
            return FetchOutcome::Blocked;
        }

        match self.source.fetch(url).await {
            Ok(content) => {
                info!(target: "casper::webscan", "Fetched: {}", url);
                self.stats.record_fetched();
                FetchOutcome::Fetched(content)
            }
            Err(e) => {
                warn!(target: "casper::webscan", "Failed to fetch {}: {}", url, e);
                self.stats.record_failed();
                FetchOutcome::Failed(e.to_string())
            }
        }
    }
}

impl PageFetcher<HttpPageSource> {
    pub fn http(config: &ScannerConfig, enablement: Arc<dyn EnablementSource>) -> Result<Self> {
        config.validate()?;
        let source = HttpPageSource::new(config)?;
        let filter = SafetyFilter::new(config.blocked_suffixes.iter().cloned());
        Ok(Self::new(source, filter, enablement))
    }
}
