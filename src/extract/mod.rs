//! Record extraction from cached documents
//!
//! An [`Extractor`] is built per coach from the cache store alone and never
//! touches the network. Every getter is independent and returns `None` for
//! anything it cannot read: a missing document, markup that moved, or a
//! value outside the known vocabulary.

mod html;

pub use html::{element_text, select_first, select_first_in, select_text};

use crate::locale::Locale;
use crate::record::{CoachRecord, Title};
use crate::site::Site;

/// Field getters over one coach's cached documents
pub trait Extractor {
    fn site(&self) -> Site;

    fn username(&self) -> &str;

    fn name(&self) -> Option<String>;

    fn image_url(&self) -> Option<String>;

    fn title(&self) -> Option<Title>;

    /// Recognized languages only; unrecognized entries are dropped
    fn languages(&self) -> Option<Vec<Locale>>;

    fn rapid(&self) -> Option<i64>;

    fn blitz(&self) -> Option<i64>;

    fn bullet(&self) -> Option<i64>;

    /// Assembles the record, calling each getter exactly once
    fn extract(&self) -> CoachRecord {
        CoachRecord {
            site: self.site(),
            username: self.username().to_string(),
            name: self.name(),
            image_url: self.image_url(),
            title: self.title(),
            languages: self.languages().filter(|langs| !langs.is_empty()),
            rapid: self.rapid(),
            blitz: self.blitz(),
            bullet: self.bullet(),
        }
    }
}

/// Parses a displayed rating such as `1834` or the provisional `1500?`
///
/// A single trailing non-digit marker is stripped before parsing. Anything
/// else that is not a plain integer yields `None`.
pub fn parse_rating(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let digits = match raw.chars().last() {
        Some(c) if !c.is_ascii_digit() => &raw[..raw.len() - c.len_utf8()],
        Some(_) => raw,
        None => return None,
    };
    digits.parse().ok()
}
