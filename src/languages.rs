//! Languages offered for summaries, translations and chat replies.
//!
//! The proxy only ever receives the English `name`; codes exist for the
//! selectors and the CLI.

use serde::Serialize;

/// A selectable output language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Short code used by selectors (e.g. "hi")
    pub code: &'static str,
    /// English name passed to the model (e.g. "Hindi")
    pub name: &'static str,
    /// Name in the language itself
    pub native: &'static str,
}

const fn lang(code: &'static str, name: &'static str, native: &'static str) -> Language {
    Language { code, name, native }
}

/// Name of the language that needs no extra instruction
pub const DEFAULT_LANGUAGE: &str = "English";

/// All supported languages in display order
pub const LANGUAGES: &[Language] = &[
    // International
    lang("en", "English", "English"),
    lang("es", "Spanish", "Español"),
    lang("fr", "French", "Français"),
    lang("de", "German", "Deutsch"),
    lang("pt", "Portuguese", "Português"),
    lang("ru", "Russian", "Русский"),
    lang("ja", "Japanese", "日本語"),
    lang("ko", "Korean", "한국어"),
    lang("zh", "Chinese", "中文"),
    lang("ar", "Arabic", "العربية"),
    // Major Indian Languages
    lang("hi", "Hindi", "हिंदी"),
    lang("bn", "Bengali", "বাংলা"),
    lang("te", "Telugu", "తెలుగు"),
    lang("mr", "Marathi", "मराठी"),
    lang("ta", "Tamil", "தமிழ்"),
    lang("gu", "Gujarati", "ગુજરાતી"),
    lang("kn", "Kannada", "ಕನ್ನಡ"),
    lang("ml", "Malayalam", "മലയാളം"),
    lang("pa", "Punjabi", "ਪੰਜਾਬੀ"),
    lang("or", "Odia", "ଓଡ଼ିଆ"),
    lang("as", "Assamese", "অসমীয়া"),
    lang("ur", "Urdu", "اردو"),
    // Other Indian Languages
    lang("sa", "Sanskrit", "संस्कृतम्"),
    lang("ks", "Kashmiri", "कॉशुर"),
    lang("sd", "Sindhi", "سنڌي"),
    lang("ne", "Nepali", "नेपाली"),
    lang("kok", "Konkani", "कोंकणी"),
    lang("mai", "Maithili", "मैथिली"),
    lang("sat", "Santali", "ᱥᱟᱱᱛᱟᱲᱤ"),
    lang("mni", "Manipuri", "মৈতৈলোন্"),
    lang("brx", "Bodo", "बड़ो"),
    lang("doi", "Dogri", "डोगरी"),
    // Regional Indian Languages
    lang("bh", "Bhojpuri", "भोजपुरी"),
    lang("raj", "Rajasthani", "राजस्थानी"),
    lang("mag", "Magahi", "मगही"),
    lang("awh", "Awadhi", "अवधी"),
    lang("tcy", "Tulu", "ತುಳು"),
    lang("gom", "Goan Konkani", "गोंयची कोंकणी"),
    lang("kha", "Khasi", "Khasi"),
    lang("grt", "Garo", "Garo"),
    lang("lus", "Mizo", "Mizo ṭawng"),
    lang("nag", "Naga", "Naga"),
    // South Asian Languages
    lang("si", "Sinhala", "සිංහල"),
    lang("dv", "Dhivehi", "ދިވެހި"),
    lang("my", "Burmese", "မြန်မာဘာသာ"),
    lang("th", "Thai", "ไทย"),
    lang("vi", "Vietnamese", "Tiếng Việt"),
    lang("id", "Indonesian", "Bahasa Indonesia"),
    lang("ms", "Malay", "Bahasa Melayu"),
    lang("tl", "Tagalog", "Tagalog"),
    // Additional Languages
    lang("tr", "Turkish", "Türkçe"),
    lang("fa", "Persian", "فارسی"),
    lang("he", "Hebrew", "עברית"),
    lang("sw", "Swahili", "Kiswahili"),
    lang("pl", "Polish", "Polski"),
    lang("uk", "Ukrainian", "Українська"),
    lang("it", "Italian", "Italiano"),
];

/// Look up a language by code (case-insensitive).
pub fn find(code: &str) -> Option<&'static Language> {
    let code = code.trim();
    LANGUAGES.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

/// English name for a code, falling back to English for unknown codes.
pub fn name_for_code(code: &str) -> &'static str {
    find(code).map(|l| l.name).unwrap_or(DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_english_first() {
        assert_eq!(LANGUAGES[0].name, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_name_for_code() {
        assert_eq!(name_for_code("hi"), "Hindi");
        assert_eq!(name_for_code("ES"), "Spanish");
        assert_eq!(name_for_code("xx"), "English");
        assert_eq!(name_for_code(""), "English");
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<&str> = LANGUAGES.iter().map(|l| l.code).collect();
        assert_eq!(codes.len(), LANGUAGES.len());
    }
}
