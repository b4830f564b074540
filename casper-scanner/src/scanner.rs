use crate::config::ScannerConfig;
use crate::enablement::EnablementSource;
use crate::error::Result;
use crate::fetcher::{HttpPageSource, PageFetcher, PageSource};
use crate::links::extract_links;
use crate::result::ScannedPage;
use crate::safety::SafetyFilter;
use crate::stats::ScanStats;
use std::sync::Arc;
use tracing::{debug, info};

/// Called once for every page that was fetched successfully.
pub type PageCallback = Arc<dyn Fn(&ScannedPage) + Send + Sync>;

/// Depth-bounded recursive scanner.
///
/// Pages are visited depth-first and strictly one at a time: a page's links
/// are fully explored before the next sibling is fetched. There is no
/// visited set, so a URL reachable over several paths is fetched once per
/// path. Termination comes from the depth bound alone.
pub struct Scanner<S> {
    fetcher: PageFetcher<S>,
    enablement: Arc<dyn EnablementSource>,
    config: ScannerConfig,
    page_callback: Option<PageCallback>,
}

impl Scanner<HttpPageSource> {
    pub fn new(config: ScannerConfig, enablement: Arc<dyn EnablementSource>) -> Result<Self> {
        let fetcher = PageFetcher::http(&config, enablement.clone())?;
        Ok(Self::from_parts(fetcher, enablement, config))
    }
}

impl<S: PageSource> Scanner<S> {
    /// Builds a scanner over a custom page source.
    pub fn with_source(
        source: S,
        config: ScannerConfig,
        enablement: Arc<dyn EnablementSource>,
    ) -> Self {
        let filter = SafetyFilter::new(config.blocked_suffixes.iter().cloned());
        let fetcher = PageFetcher::new(source, filter, enablement.clone());
        Self::from_parts(fetcher, enablement, config)
    }

    fn from_parts(
        fetcher: PageFetcher<S>,
        enablement: Arc<dyn EnablementSource>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            fetcher,
            enablement,
            config,
            page_callback: None,
        }
    }

    pub fn with_page_callback(mut self, callback: PageCallback) -> Self {
        self.page_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &PageFetcher<S> {
        &self.fetcher
    }

    pub fn stats(&self) -> &Arc<ScanStats> {
        self.fetcher.stats()
    }

    /// Scans the configured seeds to the configured depth.
    pub async fn scan_default(&self) {
        let seeds = self.config.seeds.clone();
        self.scan(seeds, self.config.max_depth).await;
    }

    /// Fetches every seed in order and follows up to `max_links_per_page`
    /// safe links per page, `max_depth` levels deep counting the seeds.
    ///
    /// A no-op when scanning is disabled or `max_depth` is zero. Failures on
    /// one URL never stop the rest of the traversal.
    pub async fn scan<I, U>(&self, seeds: I, max_depth: usize)
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        if !self.enablement.is_enabled() || max_depth == 0 {
            debug!("Scan skipped (enabled: {}, depth: {})", self.enablement.is_enabled(), max_depth);
            return;
        }

        // Stack of (url, remaining depth). Pushed in reverse so pops follow
        // document order, which reproduces a recursive depth-first walk.
        let mut frontier: Vec<(String, usize)> = seeds
            .into_iter()
            .map(|url| (url.into(), max_depth))
            .collect();
        frontier.reverse();
        info!("Starting scan of {} seed(s), depth {}", frontier.len(), max_depth);

        while let Some((url, depth)) = frontier.pop() {
            let Some(content) = self.fetcher.fetch_page(&url).await.into_content() else {
                continue;
            };

            let links = extract_links(
                &content,
                self.fetcher.filter(),
                self.config.max_links_per_page,
            );
            debug!("{} yielded {} link(s) at depth {}", url, links.len(), depth);

            let page = ScannedPage::new(url, depth, content, links);
            if let Some(ref callback) = self.page_callback {
                callback(&page);
            }

            // Descending re-checks the switch, as entering a fresh sub-scan would.
            if depth > 1 && !page.links.is_empty() && self.enablement.is_enabled() {
                frontier.extend(page.links.into_iter().rev().map(|link| (link, depth - 1)));
            }
        }

        let stats = self.stats().snapshot();
        info!(
            "Scan complete. fetched: {}, blocked: {}, failed: {}, disabled: {}",
            stats.fetched, stats.blocked, stats.failed, stats.disabled
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enablement::ScanSwitch;
    use crate::error::ScanError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory site: unknown URLs fail like a connection error.
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn page(mut self, url: &str, links: &[&str]) -> Self {
            let body: String = links
                .iter()
                .map(|l| format!(r#"<a href="{}">x</a>"#, l))
                .collect();
            self.pages.insert(url.to_string(), format!("<html>{}</html>", body));
            self
        }

        fn body(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PageSource for FakeSite {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScanError::Other(format!("no route to {}", url)))
        }
    }

    fn scanner(site: FakeSite, switch: &ScanSwitch) -> Scanner<FakeSite> {
        Scanner::with_source(site, ScannerConfig::default(), Arc::new(switch.clone()))
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_nothing() {
        let switch = ScanSwitch::new();
        let scanner = scanner(FakeSite::default().page("https://a.com", &[]), &switch);

        scanner.scan(["https://a.com"], 0).await;

        assert!(scanner.fetcher().source().calls().is_empty());
    }

    #[tokio::test]
    async fn test_depth_one_does_not_expand() {
        let switch = ScanSwitch::new();
        let site = FakeSite::default()
            .page("https://a.com", &["https://a.com/1", "https://a.com/2"])
            .page("https://b.com", &["https://b.com/1"]);
        let scanner = scanner(site, &switch);

        scanner.scan(["https://a.com", "https://b.com"], 1).await;

        assert_eq!(
            scanner.fetcher().source().calls(),
            vec!["https://a.com", "https://b.com"]
        );
    }

    #[tokio::test]
    async fn test_depth_first_order() {
        let switch = ScanSwitch::new();
        let site = FakeSite::default()
            .page("https://a.com", &["https://a.com/1", "https://a.com/2"])
            .page("https://a.com/1", &["https://a.com/1/x"])
            .page("https://a.com/2", &[])
            .page("https://b.com", &[]);
        let scanner = scanner(site, &switch);

        scanner.scan(["https://a.com", "https://b.com"], 3).await;

        assert_eq!(
            scanner.fetcher().source().calls(),
            vec![
                "https://a.com",
                "https://a.com/1",
                "https://a.com/1/x",
                "https://a.com/2",
                "https://b.com",
            ]
        );
    }

    #[tokio::test]
    async fn test_disabled_scan_is_noop() {
        let switch = ScanSwitch::with_state(false);
        let scanner = scanner(FakeSite::default().page("https://a.com", &[]), &switch);

        scanner.scan(["https://a.com"], 2).await;

        assert!(scanner.fetcher().source().calls().is_empty());
        assert_eq!(scanner.stats().snapshot().disabled, 0);
    }

    #[tokio::test]
    async fn test_cycles_are_not_deduplicated() {
        let switch = ScanSwitch::new();
        let site = FakeSite::default()
            .page("https://a.com", &["https://b.com"])
            .page("https://b.com", &["https://a.com"]);
        let scanner = scanner(site, &switch);

        scanner.scan(["https://a.com"], 4).await;

        assert_eq!(
            scanner.fetcher().source().calls(),
            vec![
                "https://a.com",
                "https://b.com",
                "https://a.com",
                "https://b.com",
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let switch = ScanSwitch::new();
        let site = FakeSite::default().page("https://b.com", &[]);
        let scanner = scanner(site, &switch);

        scanner.scan(["https://down.example", "https://b.com"], 2).await;

        assert_eq!(
            scanner.fetcher().source().calls(),
            vec!["https://down.example", "https://b.com"]
        );
        let stats = scanner.stats().snapshot();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.fetched, 1);
    }

    #[tokio::test]
    async fn test_empty_body_is_skipped() {
        let switch = ScanSwitch::new();
        let site = FakeSite::default()
            .body("https://empty.com", "")
            .page("https://b.com", &[]);
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let scanner = scanner(site, &switch).with_page_callback(Arc::new(move |page: &ScannedPage| {
            seen_clone.lock().unwrap().push(page.url.clone());
        }));

        scanner.scan(["https://empty.com", "https://b.com"], 2).await;

        assert_eq!(
            scanner.fetcher().source().calls(),
            vec!["https://empty.com", "https://b.com"]
        );
        assert_eq!(*seen.lock().unwrap(), vec!["https://b.com".to_string()]);
    }

    #[tokio::test]
    async fn test_page_callback_sees_every_fetched_page() {
        let switch = ScanSwitch::new();
        let site = FakeSite::default()
            .page("https://a.com", &["https://a.com/1", "https://agency.gov"])
            .page("https://a.com/1", &[]);
        let seen: Arc<Mutex<Vec<(String, usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let scanner = scanner(site, &switch).with_page_callback(Arc::new(move |page: &ScannedPage| {
            seen_clone
                .lock()
                .unwrap()
                .push((page.url.clone(), page.depth, page.links.len()));
        }));

        scanner.scan(["https://a.com"], 2).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("https://a.com".to_string(), 2, 1),
                ("https://a.com/1".to_string(), 1, 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_default_uses_configured_seeds() {
        let switch = ScanSwitch::new();
        let config = ScannerConfig {
            seeds: vec!["https://seed.example".to_string()],
            max_depth: 1,
            ..Default::default()
        };
        let site = FakeSite::default().page("https://seed.example", &["https://other.example"]);
        let scanner = Scanner::with_source(site, config, Arc::new(switch.clone()));

        scanner.scan_default().await;

        assert_eq!(
            scanner.fetcher().source().calls(),
            vec!["https://seed.example"]
        );
    }
}
