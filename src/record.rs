//! Normalized coach records
//!
//! A [`CoachRecord`] is the unit handed from extraction to persistence. Only
//! `site` and `username` are guaranteed; every other field is present only
//! when it could be read from the cached documents.

use crate::locale::Locale;
use crate::site::Site;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Chess federation titles recognized on coach profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Title {
    /// Grandmaster
    GM,
    /// International master
    IM,
    /// FIDE master
    FM,
    /// Candidate master
    CM,
    /// National master
    NM,
    WGM,
    WIM,
    WFM,
    WCM,
    WNM,
}

impl Title {
    pub const ALL: [Title; 10] = [
        Self::GM,
        Self::IM,
        Self::FM,
        Self::CM,
        Self::NM,
        Self::WGM,
        Self::WIM,
        Self::WFM,
        Self::WCM,
        Self::WNM,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GM => "GM",
            Self::IM => "IM",
            Self::FM => "FM",
            Self::CM => "CM",
            Self::NM => "NM",
            Self::WGM => "WGM",
            Self::WIM => "WIM",
            Self::WFM => "WFM",
            Self::WCM => "WCM",
            Self::WNM => "WNM",
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Title {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown title '{}'", s))
    }
}

/// One coach, keyed by `(site, username)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoachRecord {
    pub site: Site,
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Locale>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rapid: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blitz: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet: Option<i64>,
}

impl CoachRecord {
    /// Creates a record carrying only its key
    pub fn new(site: Site, username: impl Into<String>) -> Self {
        Self {
            site,
            username: username.into(),
            name: None,
            image_url: None,
            title: None,
            languages: None,
            rapid: None,
            blitz: None,
            bullet: None,
        }
    }
}
