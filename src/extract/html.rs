//! Small `scraper` helpers shared by the per-site rules
//!
//! Selectors are compiled per call. An invalid selector is treated the same
//! as a selector that matches nothing.

use scraper::{ElementRef, Html, Selector};

/// Returns the first element in the document matching `css`
pub fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

/// Returns the first descendant of `element` matching `css`
pub fn select_first_in<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    element.select(&selector).next()
}

/// Returns the trimmed text of the first element matching `css`
///
/// Elements whose text is blank count as absent.
pub fn select_text(document: &Html, css: &str) -> Option<String> {
    select_first(document, css)
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Concatenated, trimmed text content of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
