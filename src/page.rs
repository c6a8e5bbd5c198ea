//! Page snapshot: rendered text plus a queryable DOM
//!
//! A snapshot is an immutable capture of one page at one instant. Every
//! helper is a read-only lookup, so the engine stays testable against
//! in-memory HTML fixtures.

use scraper::{ElementRef, Html, Selector};

/// Immutable capture of a page.
pub struct PageSnapshot {
    /// Rendered text of the page body.
    pub text: String,
    dom: Html,
}

impl PageSnapshot {
    /// Parse an HTML document and derive the body text from it.
    pub fn from_html(html: &str) -> Self {
        let dom = Html::parse_document(html);
        let text = body_text(&dom);
        Self { text, dom }
    }

    /// Build a snapshot from separately captured text and markup.
    ///
    /// Callers that already hold the rendered text of a live page pass it
    /// here so the text lookups see exactly what the page showed.
    pub fn from_parts(text: impl Into<String>, html: &str) -> Self {
        Self {
            text: text.into(),
            dom: Html::parse_document(html),
        }
    }

    /// Trimmed text content of the first element matching the selector.
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.dom
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    /// Trimmed text content of every element matching the selector.
    pub fn all_texts(&self, selector: &Selector) -> Vec<String> {
        self.dom
            .select(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect()
    }

    /// Attribute value of the first element matching the selector.
    pub fn first_attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.dom
            .select(selector)
            .next()
            .and_then(|el| el.value().attr(attr).map(String::from))
    }

    /// Text of the node immediately following the first match.
    ///
    /// Covers both a bare text node and an element sibling.
    pub fn next_sibling_text(&self, selector: &Selector) -> Option<String> {
        let element = self.dom.select(selector).next()?;
        let sibling = element.next_sibling()?;
        if let Some(text) = sibling.value().as_text() {
            return Some(text.text.to_string());
        }
        ElementRef::wrap(sibling).map(|el| el.text().collect::<String>())
    }
}

fn body_text(dom: &Html) -> String {
    let selector = match Selector::parse("body") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };

    dom.select(&selector)
        .next()
        .map(|body| {
            body.text()
                .map(str::trim)
                .filter(|chunk| !chunk.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
