use crate::learning::LearningSink;
use crate::summary::summarize_page;
use casper_scanner::{PageSource, ScanStatsSnapshot, ScannedPage, Scanner};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};
use url::Url;

/// Options for one autonomous scan run.
pub struct ScanOptions {
    /// Seeds to start from. Empty means the scanner's configured seeds.
    pub seeds: Vec<String>,
    /// Overrides the configured depth when set.
    pub max_depth: Option<usize>,
    pub show_progress_bars: bool,
}

/// What the scan saw of one fetched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub depth: usize,
    pub content_length: usize,
    pub links_found: Vec<String>,
    pub learned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub pages: Vec<PageRecord>,
    pub stats: ScanStatsSnapshot,
}

/// Callback for reporting scan progress
pub type ScanProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Identifier scanned pages are recorded under: `web:<host>`.
pub fn learning_identifier(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());
    format!("web:{}", host)
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Runs a scan and records a summary of every fetched page into `sink`.
pub async fn execute_scan<S: PageSource>(
    scanner: Scanner<S>,
    sink: Arc<dyn LearningSink>,
    options: ScanOptions,
    progress_callback: Option<ScanProgressCallback>,
) -> ScanSummary {
    let ScanOptions {
        seeds,
        max_depth,
        show_progress_bars,
    } = options;

    let seeds = if seeds.is_empty() {
        scanner.config().seeds.clone()
    } else {
        seeds
    };
    let max_depth = max_depth.unwrap_or(scanner.config().max_depth);

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Starting scan...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let pages: Arc<Mutex<Vec<PageRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let processed = Arc::new(AtomicUsize::new(0));

    let pages_clone = pages.clone();
    let processed_clone = processed.clone();
    let pb_clone = progress_bar.clone();
    let progress_clone = progress_callback.clone();
    let scanner = scanner.with_page_callback(Arc::new(move |page: &ScannedPage| {
        let learned = match summarize_page(&page.content) {
            Some(summary) => sink.record(&learning_identifier(&page.url), &summary),
            None => {
                debug!("Nothing to learn from {}", page.url);
                false
            }
        };

        let count = processed_clone.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!("Scanning... {} pages fetched", count));
            pb.tick();
        }
        if let Some(ref callback) = progress_clone {
            callback(format!("Fetched {} ({} links)", page.url, page.links.len()));
        }

        match pages_clone.lock() {
            Ok(mut pages) => pages.push(PageRecord {
                url: page.url.clone(),
                depth: page.depth,
                content_length: page.content.len(),
                links_found: page.links.clone(),
                learned,
            }),
            Err(_) => error!("Page list lock poisoned; dropping {}", page.url),
        }
    }));

    scanner.scan(seeds, max_depth).await;

    if let Some(ref pb) = progress_bar {
        let total = processed.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Scan complete! {} pages fetched", total));
    }

    let pages = match pages.lock() {
        Ok(pages) => pages.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };

    ScanSummary {
        pages,
        stats: scanner.stats().snapshot(),
    }
}

/// Generate a scan report from a summary
pub fn generate_scan_report(summary: &ScanSummary) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Pages fetched: {}\n", summary.stats.fetched));

    let total_links: usize = summary.pages.iter().map(|p| p.links_found.len()).sum();
    report.push_str(&format!("  Links kept: {}\n", total_links));

    let learned = summary.pages.iter().filter(|p| p.learned).count();
    report.push_str(&format!("  Pages learned: {}\n", learned));
    report.push_str(&format!("  Blocked: {}\n", summary.stats.blocked));
    report.push_str(&format!("  Failed: {}\n", summary.stats.failed));
    if summary.stats.disabled > 0 {
        report.push_str(&format!(
            "  Skipped (scanning disabled): {}\n",
            summary.stats.disabled
        ));
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let mut by_host: BTreeMap<String, Vec<&PageRecord>> = BTreeMap::new();
    for page in &summary.pages {
        if let Ok(url) = Url::parse(&page.url)
            && let Some(host) = url.host_str()
        {
            by_host.entry(host.to_string()).or_default().push(page);
        }
    }

    for (host, pages) in by_host.iter() {
        report.push_str(&format!("## {}\n", host));
        report.push_str(&format!("  {} pages fetched\n\n", pages.len()));

        for page in pages {
            let marker = if page.learned { "+" } else { "-" };
            report.push_str(&format!(
                "  {} d{} {} ({} links)\n",
                marker,
                page.depth,
                extract_url_path(&page.url),
                page.links_found.len()
            ));
        }
        report.push('\n');
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_identifier() {
        assert_eq!(
            learning_identifier("https://Example.com/about"),
            "web:example.com"
        );
        assert_eq!(learning_identifier("nonsense"), "web:unknown");
    }
}
