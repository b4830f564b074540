use crate::data::MAX_MEMORY_CHARS;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));
static TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, p, li").expect("valid text selector"));

/// Short plain-text summary of a page: its title followed by the leading
/// heading and paragraph text, capped to fit a single memory.
///
/// Returns `None` for pages with no title and no readable text.
pub fn summarize_page(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .unwrap_or_default();

    let body = collapse_whitespace(
        &document
            .select(&TEXT_SELECTOR)
            .flat_map(|el| el.text())
            .collect::<Vec<_>>()
            .join(" "),
    );

    let summary = match (title.is_empty(), body.is_empty()) {
        (true, true) => return None,
        (false, true) => title,
        (true, false) => body,
        (false, false) => format!("{} - {}", title, body),
    };

    Some(truncate_chars(&summary, MAX_MEMORY_CHARS))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
