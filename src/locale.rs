//! Locale vocabulary for spoken languages
//!
//! Coaches list the languages they speak either as native language names
//! (lichess) or implicitly through the language of their profile text
//! (chess.com). Both paths resolve into the closed [`Locale`] table below,
//! whose tags are what gets persisted.

use serde::{Serialize, Serializer};
use std::fmt;

/// A `{language}-{COUNTRY}` tag paired with the language's own name for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    code: &'static str,
    native_name: &'static str,
}

impl Locale {
    const fn new(code: &'static str, native_name: &'static str) -> Self {
        Self { code, native_name }
    }

    /// The persisted tag, e.g. `de-DE`
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// The language name as written in that language, e.g. `Deutsch`
    pub fn native_name(&self) -> &'static str {
        self.native_name
    }

    /// Looks up a locale by its tag
    pub fn from_code(code: &str) -> Option<Self> {
        LOCALES.iter().copied().find(|l| l.code == code)
    }

    /// Looks up a locale by the native language name shown on profile pages
    pub fn from_native_name(name: &str) -> Option<Self> {
        LOCALES.iter().copied().find(|l| l.native_name == name)
    }

    /// All known locales in display order
    pub fn all() -> &'static [Locale] {
        &LOCALES
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

static LOCALES: [Locale; 101] = [
    Locale::new("en-GB", "English"),
    Locale::new("af-ZA", "Afrikaans"),
    Locale::new("an-ES", "Aragonés"),
    Locale::new("ar-SA", "العربية"),
    Locale::new("as-IN", "অসমীয়া"),
    Locale::new("av-DA", "авар мацӀ"),
    Locale::new("az-AZ", "Azərbaycanca"),
    Locale::new("be-BY", "Беларуская"),
    Locale::new("bg-BG", "български език"),
    Locale::new("bn-BD", "বাংলা"),
    Locale::new("br-FR", "Brezhoneg"),
    Locale::new("bs-BA", "Bosanski"),
    Locale::new("ca-ES", "Català, valencià"),
    Locale::new("ckb-IR", "کوردی سۆرانی"),
    Locale::new("co-FR", "Corsu"),
    Locale::new("cs-CZ", "Čeština"),
    Locale::new("cv-CU", "чӑваш чӗлхи"),
    Locale::new("cy-GB", "Cymraeg"),
    Locale::new("da-DK", "Dansk"),
    Locale::new("de-DE", "Deutsch"),
    Locale::new("el-GR", "Ελληνικά"),
    Locale::new("en-US", "English (US)"),
    Locale::new("eo-UY", "Esperanto"),
    Locale::new("es-ES", "Español"),
    Locale::new("et-EE", "Eesti keel"),
    Locale::new("eu-ES", "Euskara"),
    Locale::new("fa-IR", "فارسی"),
    Locale::new("fi-FI", "Suomen kieli"),
    Locale::new("fo-FO", "Føroyskt"),
    Locale::new("fr-FR", "Français"),
    Locale::new("frp-IT", "Arpitan"),
    Locale::new("fy-NL", "Frysk"),
    Locale::new("ga-IE", "Gaeilge"),
    Locale::new("gd-GB", "Gàidhlig"),
    Locale::new("gl-ES", "Galego"),
    Locale::new("gsw-CH", "Schwizerdütsch"),
    Locale::new("gu-IN", "ગુજરાતી"),
    Locale::new("he-IL", "עִבְרִית"),
    Locale::new("hi-IN", "हिन्दी, हिंदी"),
    Locale::new("hr-HR", "Hrvatski"),
    Locale::new("hu-HU", "Magyar"),
    Locale::new("hy-AM", "Հայերեն"),
    Locale::new("ia-IA", "Interlingua"),
    Locale::new("id-ID", "Bahasa Indonesia"),
    Locale::new("io-EN", "Ido"),
    Locale::new("is-IS", "Íslenska"),
    Locale::new("it-IT", "Italiano"),
    Locale::new("ja-JP", "日本語"),
    Locale::new("jbo-EN", "Lojban"),
    Locale::new("jv-ID", "Basa Jawa"),
    Locale::new("ka-GE", "ქართული"),
    Locale::new("kab-DZ", "Taqvaylit"),
    Locale::new("kk-KZ", "қазақша"),
    Locale::new("kmr-TR", "Kurdî (Kurmancî)"),
    Locale::new("kn-IN", "ಕನ್ನಡ"),
    Locale::new("ko-KR", "한국어"),
    Locale::new("ky-KG", "кыргызча"),
    Locale::new("la-LA", "Lingua Latina"),
    Locale::new("lb-LU", "Lëtzebuergesch"),
    Locale::new("lt-LT", "Lietuvių kalba"),
    Locale::new("lv-LV", "Latviešu valoda"),
    Locale::new("mg-MG", "Fiteny malagasy"),
    Locale::new("mk-MK", "македонски јази"),
    Locale::new("ml-IN", "മലയാളം"),
    Locale::new("mn-MN", "монгол"),
    Locale::new("mr-IN", "मराठी"),
    Locale::new("ms-MY", "Melayu"),
    Locale::new("nb-NO", "Norsk bokmål"),
    Locale::new("ne-NP", "नेपाली"),
    Locale::new("nl-NL", "Nederlands"),
    Locale::new("nn-NO", "Norsk nynorsk"),
    Locale::new("pi-IN", "पालि"),
    Locale::new("pl-PL", "Polski"),
    Locale::new("ps-AF", "پښتو"),
    Locale::new("pt-PT", "Português"),
    Locale::new("pt-BR", "Português (BR)"),
    Locale::new("ro-RO", "Română"),
    Locale::new("ru-RU", "русский язык"),
    Locale::new("ry-UA", "Русинська бисїда"),
    Locale::new("sa-IN", "संस्कृत"),
    Locale::new("sk-SK", "Slovenčina"),
    Locale::new("sl-SI", "Slovenščina"),
    Locale::new("sq-AL", "Shqip"),
    Locale::new("sr-SP", "Српски језик"),
    Locale::new("sv-SE", "Svenska"),
    Locale::new("sw-KE", "Kiswahili"),
    Locale::new("ta-IN", "தமிழ்"),
    Locale::new("tg-TJ", "тоҷикӣ"),
    Locale::new("th-TH", "ไทย"),
    Locale::new("tk-TM", "Türkmençe"),
    Locale::new("tl-PH", "Tagalog"),
    Locale::new("tp-TP", "Toki pona"),
    Locale::new("tr-TR", "Türkçe"),
    Locale::new("uk-UA", "українська"),
    Locale::new("ur-PK", "اُردُو"),
    Locale::new("uz-UZ", "oʻzbekcha"),
    Locale::new("vi-VN", "Tiếng Việt"),
    Locale::new("yo-NG", "Yorùbá"),
    Locale::new("zh-CN", "中文"),
    Locale::new("zh-TW", "繁體中文"),
    Locale::new("zu-ZA", "isiZulu"),
];

/// Language identification over free text
///
/// Implementations must be cheap to share between worker tasks.
pub trait DetectLanguage: Send + Sync {
    /// Returns the locale the text is most likely written in, if any
    fn detect(&self, text: &str) -> Option<Locale>;
}

/// [`DetectLanguage`] backed by the `whatlang` trigram detector
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl DetectLanguage for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<Locale> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let info = whatlang::detect(text)?;
        let code = match info.lang().code() {
            "cmn" => "zh-CN",
            "hrv" => "hr-HR",
            "dan" => "da-DK",
            "nld" => "nl-NL",
            "eng" => "en-GB",
            "fin" => "fi-FI",
            "fra" => "fr-FR",
            "deu" => "de-DE",
            "hun" => "hu-HU",
            "ita" => "it-IT",
            "kor" => "ko-KR",
            "lat" => "la-LA",
            "pes" => "fa-IR",
            "pol" => "pl-PL",
            "por" => "pt-PT",
            "ron" => "ro-RO",
            "rus" => "ru-RU",
            "slv" => "sl-SI",
            "spa" => "es-ES",
            "swe" => "sv-SE",
            "tgl" => "tl-PH",
            "tur" => "tr-TR",
            "ukr" => "uk-UA",
            "vie" => "vi-VN",
            _ => return None,
        };
        Locale::from_code(code)
    }
}
