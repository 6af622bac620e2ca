//! lichess.org coach directory rules
//!
//! Per coach we keep the coach page (picture, languages) and the public
//! profile page (name, title, ratings).

use super::{identity_after, join_url, ArtifactRequest, Site, SiteRules};
use crate::cache::CacheStore;
use crate::extract::{
    element_text, parse_rating, select_first, select_first_in, select_text, Extractor,
};
use crate::locale::{DetectLanguage, Locale};
use crate::record::Title;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;

pub static RULES: SiteRules = SiteRules {
    site: Site::Lichess,
    default_base_url: "https://lichess.org",
    default_max_pages: 162,
    default_request_delay: Duration::from_secs(5),
    listing_url,
    parse_listing,
    artifacts,
    extractor,
};

const STATS_ARTIFACT: &str = "stats.html";

const IMAGE_HOST: &str = "image.lichess1.org";

fn profile_artifact(identity: &str) -> String {
    format!("{}.html", identity)
}

fn listing_url(base: &str, page_no: u32) -> String {
    join_url(base, &format!("/coach/all/all/alphabetical?page={}", page_no))
}

fn parse_listing(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(widget) = Selector::parse("article.coach-widget") else {
        return Vec::new();
    };

    document
        .select(&widget)
        .filter_map(|article| select_first_in(article, "a.overlay"))
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| identity_after(href, "/coach/"))
        .collect()
}

fn artifacts(base: &str, identity: &str) -> Vec<ArtifactRequest> {
    vec![
        ArtifactRequest {
            url: join_url(base, &format!("/coach/{}", identity)),
            name: profile_artifact(identity),
        },
        ArtifactRequest {
            url: join_url(base, &format!("/@/{}", identity)),
            name: STATS_ARTIFACT.to_string(),
        },
    ]
}

fn extractor(
    cache: &CacheStore,
    identity: &str,
    _detector: Arc<dyn DetectLanguage>,
) -> Box<dyn Extractor> {
    let profile = cache
        .read_artifact(identity, &profile_artifact(identity))
        .map(|text| Html::parse_document(&text));
    let stats = cache
        .read_artifact(identity, STATS_ARTIFACT)
        .map(|text| Html::parse_document(&text));

    Box::new(LichessExtractor {
        username: identity.to_string(),
        profile,
        stats,
    })
}

struct LichessExtractor {
    username: String,
    profile: Option<Html>,
    stats: Option<Html>,
}

impl LichessExtractor {
    /// Reads `<a href="/@/{user}/perf/{perf}"><rating><strong>..</strong></rating></a>`
    fn rating(&self, perf: &str) -> Option<i64> {
        let stats = self.stats.as_ref()?;
        let href = format!("/@/{}/perf/{}", self.username, perf);
        let links = Selector::parse("a[href]").ok()?;

        let link = stats
            .select(&links)
            .find(|a| a.value().attr("href") == Some(href.as_str()))?;
        let strong = select_first_in(link, "rating strong")?;
        parse_rating(&element_text(strong))
    }
}

impl Extractor for LichessExtractor {
    fn site(&self) -> Site {
        Site::Lichess
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn name(&self) -> Option<String> {
        select_text(
            self.stats.as_ref()?,
            "div.profile-side div.user-infos strong.name",
        )
    }

    fn image_url(&self) -> Option<String> {
        let picture = select_first(self.profile.as_ref()?, "img.picture")?;
        let src = picture.value().attr("src")?;
        src.contains(IMAGE_HOST).then(|| src.to_string())
    }

    fn title(&self) -> Option<Title> {
        select_text(self.stats.as_ref()?, "span.utitle")?.parse().ok()
    }

    fn languages(&self) -> Option<Vec<Locale>> {
        let cell = select_first(self.profile.as_ref()?, "tr.languages td")?;
        Some(
            element_text(cell)
                .split(',')
                .filter_map(|name| Locale::from_native_name(name.trim()))
                .collect(),
        )
    }

    fn rapid(&self) -> Option<i64> {
        self.rating("rapid")
    }

    fn blitz(&self) -> Option<i64> {
        self.rating("blitz")
    }

    fn bullet(&self) -> Option<i64> {
        self.rating("bullet")
    }
}
