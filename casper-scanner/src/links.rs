use crate::safety::SafetyFilter;
use regex::Regex;
use std::sync::LazyLock;

static HREF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="(https?://[^"]+)""#).expect("valid href pattern"));

/// Pulls absolute `href="http(s)://..."` targets out of raw page content.
///
/// Blocked links are dropped first, then the list is cut to `max_links`,
/// so up to `max_links` safe links survive in document order. Relative
/// links and single-quoted attributes are not matched.
pub fn extract_links(content: &str, filter: &SafetyFilter, max_links: usize) -> Vec<String> {
    HREF_PATTERN
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|url| filter.is_safe(url))
        .take(max_links)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_absolute_links_in_order() {
        let html = r#"<a href="https://a.example.com/1">1</a>
            <a href="http://b.example.com/2">2</a>
            <a href="/relative">skip</a>
            <a href='https://single.example.com'>skip</a>"#;
        let links = extract_links(html, &SafetyFilter::default(), 10);
        assert_eq!(
            links,
            vec!["https://a.example.com/1", "http://b.example.com/2"]
        );
    }

    #[test]
    fn test_blocked_links_are_filtered_before_cap() {
        let mut html = String::new();
        for i in 0..3 {
            html.push_str(&format!(r#"<a href="https://agency{}.gov">g</a>"#, i));
        }
        for i in 0..12 {
            html.push_str(&format!(r#"<a href="https://site{}.example.com">s</a>"#, i));
        }
        let links = extract_links(&html, &SafetyFilter::default(), 10);
        assert_eq!(links.len(), 10);
        assert_eq!(links[0], "https://site0.example.com");
        assert_eq!(links[9], "https://site9.example.com");
        assert!(links.iter().all(|l| !l.ends_with(".gov")));
    }

    #[test]
    fn test_no_links() {
        assert!(extract_links("plain text", &SafetyFilter::default(), 10).is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"<a href="https://x.com">a</a><a href="https://x.com">b</a>"#;
        assert_eq!(extract_links(html, &SafetyFilter::default(), 10).len(), 2);
    }
}
