//! chess.com coach directory rules
//!
//! Per coach we keep the member profile page and the stats callback JSON.
//! Languages are not listed on chess.com profiles, so they are inferred from
//! the language of the "about" section.

use super::{identity_after, join_url, ArtifactRequest, Site, SiteRules};
use crate::cache::CacheStore;
use crate::extract::{element_text, parse_rating, select_first, select_text, Extractor};
use crate::locale::{DetectLanguage, Locale};
use crate::record::Title;
use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub static RULES: SiteRules = SiteRules {
    site: Site::Chesscom,
    default_base_url: "https://www.chess.com",
    default_max_pages: 64,
    default_request_delay: Duration::from_secs(3),
    listing_url,
    parse_listing,
    artifacts,
    extractor,
};

const STATS_ARTIFACT: &str = "stats.json";

const IMAGE_HOST: &str = "images.chesscomfiles.com";

fn profile_artifact(identity: &str) -> String {
    format!("{}.html", identity)
}

fn listing_url(base: &str, page_no: u32) -> String {
    join_url(base, &format!("/coaches?sortBy=alphabetical&page={}", page_no))
}

fn parse_listing(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a.members-categories-username") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| identity_after(href, "/member/"))
        .collect()
}

fn artifacts(base: &str, identity: &str) -> Vec<ArtifactRequest> {
    vec![
        ArtifactRequest {
            url: join_url(base, &format!("/member/{}", identity)),
            name: profile_artifact(identity),
        },
        ArtifactRequest {
            url: join_url(base, &format!("/callback/member/stats/{}", identity)),
            name: STATS_ARTIFACT.to_string(),
        },
    ]
}

fn extractor(
    cache: &CacheStore,
    identity: &str,
    detector: Arc<dyn DetectLanguage>,
) -> Box<dyn Extractor> {
    let profile = cache
        .read_artifact(identity, &profile_artifact(identity))
        .map(|text| Html::parse_document(&text));
    let stats = cache
        .read_artifact(identity, STATS_ARTIFACT)
        .map(|text| parse_stats(&text))
        .unwrap_or_default();

    Box::new(ChesscomExtractor {
        username: identity.to_string(),
        profile,
        stats,
        detector,
    })
}

/// Indexes `{"stats": [{"key": .., "stats": {..}}]}` by key
fn parse_stats(text: &str) -> HashMap<String, Value> {
    let Ok(json) = serde_json::from_str::<Value>(text) else {
        return HashMap::new();
    };

    json.get("stats")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let key = entry.get("key")?.as_str()?;
                    let stats = entry.get("stats")?;
                    Some((key.to_string(), stats.clone()))
                })
                .collect()
        })
        .unwrap_or_default()
}

struct ChesscomExtractor {
    username: String,
    profile: Option<Html>,
    stats: HashMap<String, Value>,
    detector: Arc<dyn DetectLanguage>,
}

impl ChesscomExtractor {
    fn rating(&self, key: &str) -> Option<i64> {
        match self.stats.get(key)?.get("rating")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => parse_rating(s),
            _ => None,
        }
    }
}

impl Extractor for ChesscomExtractor {
    fn site(&self) -> Site {
        Site::Chesscom
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn name(&self) -> Option<String> {
        select_text(self.profile.as_ref()?, "div.profile-card-name")
    }

    fn image_url(&self) -> Option<String> {
        let img = select_first(self.profile.as_ref()?, "div.profile-header-avatar img")?;
        let src = img.value().attr("src")?;
        src.contains(IMAGE_HOST).then(|| src.to_string())
    }

    fn title(&self) -> Option<Title> {
        select_text(self.profile.as_ref()?, "a.profile-card-chesstitle")?
            .parse()
            .ok()
    }

    fn languages(&self) -> Option<Vec<Locale>> {
        let about = select_first(self.profile.as_ref()?, "div.profile-about")?;
        let locale = self.detector.detect(&element_text(about))?;
        Some(vec![locale])
    }

    fn rapid(&self) -> Option<i64> {
        self.rating("rapid")
    }

    fn blitz(&self) -> Option<i64> {
        self.rating("lightning")
    }

    fn bullet(&self) -> Option<i64> {
        self.rating("bullet")
    }
}
