//! Built-in language code table.
//!
//! Maps ISO 639-2 bibliographic and terminology codes, ISO 639-1 codes and
//! English display names onto one canonical form (639-2/T), so a tag coming
//! from the container, a track name or the classifier compares equal
//! whichever way it was spelled.

/// One row of the language table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-2/T code (canonical form).
    pub alpha3: &'static str,
    /// ISO 639-2/B code, when it differs from the terminology code.
    pub alpha3_b: Option<&'static str>,
    /// ISO 639-1 code.
    pub alpha2: Option<&'static str>,
    /// English display name.
    pub name: &'static str,
}

const fn lang(
    alpha3: &'static str,
    alpha3_b: Option<&'static str>,
    alpha2: Option<&'static str>,
    name: &'static str,
) -> Language {
    Language {
        alpha3,
        alpha3_b,
        alpha2,
        name,
    }
}

/// Every language the tool knows by name.
pub static LANGUAGES: &[Language] = &[
    lang("eng", None, Some("en"), "English"),
    lang("jpn", None, Some("ja"), "Japanese"),
    lang("spa", None, Some("es"), "Spanish"),
    lang("por", None, Some("pt"), "Portuguese"),
    lang("fra", Some("fre"), Some("fr"), "French"),
    lang("deu", Some("ger"), Some("de"), "German"),
    lang("ita", None, Some("it"), "Italian"),
    lang("kor", None, Some("ko"), "Korean"),
    lang("pol", None, Some("pl"), "Polish"),
    lang("rus", None, Some("ru"), "Russian"),
    lang("swe", None, Some("sv"), "Swedish"),
    lang("tur", None, Some("tr"), "Turkish"),
    lang("vie", None, Some("vi"), "Vietnamese"),
    lang("ara", None, Some("ar"), "Arabic"),
    lang("heb", None, Some("he"), "Hebrew"),
    lang("cat", None, Some("ca"), "Catalan"),
    lang("ces", Some("cze"), Some("cs"), "Czech"),
    lang("dan", None, Some("da"), "Danish"),
    lang("ell", Some("gre"), Some("el"), "Greek"),
    lang("fin", None, Some("fi"), "Finnish"),
    lang("hun", None, Some("hu"), "Hungarian"),
    lang("ind", None, Some("id"), "Indonesian"),
    lang("nor", None, Some("no"), "Norwegian"),
    lang("nld", Some("dut"), Some("nl"), "Dutch"),
    lang("ron", Some("rum"), Some("ro"), "Romanian"),
    lang("slk", Some("slo"), Some("sk"), "Slovak"),
    lang("slv", None, Some("sl"), "Slovenian"),
    lang("srp", None, Some("sr"), "Serbian"),
    lang("ukr", None, Some("uk"), "Ukrainian"),
    lang("zho", Some("chi"), Some("zh"), "Chinese"),
    lang("hin", None, Some("hi"), "Hindi"),
    lang("tha", None, Some("th"), "Thai"),
    lang("msa", Some("may"), Some("ms"), "Malay"),
    lang("fil", None, None, "Filipino"),
    lang("tgl", None, Some("tl"), "Tagalog"),
    lang("bul", None, Some("bg"), "Bulgarian"),
    lang("hrv", None, Some("hr"), "Croatian"),
    lang("est", None, Some("et"), "Estonian"),
    lang("lav", None, Some("lv"), "Latvian"),
    lang("lit", None, Some("lt"), "Lithuanian"),
    lang("isl", Some("ice"), Some("is"), "Icelandic"),
    lang("fas", Some("per"), Some("fa"), "Persian"),
    lang("glg", None, Some("gl"), "Galician"),
    lang("eus", Some("baq"), Some("eu"), "Basque"),
    lang("und", None, None, "Undetermined"),
    lang("zxx", None, None, "No linguistic content"),
];

/// Informal tags seen in track names and older files.
const ALIASES: &[(&str, &str)] = &[("jp", "jpn"), ("jap", "jpn"), ("cn", "zho"), ("gr", "ell")];

/// Look up a table row by any known spelling (case-insensitive).
pub fn lookup(tag: &str) -> Option<&'static Language> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return None;
    }
    let tag = ALIASES
        .iter()
        .find(|(alias, _)| *alias == tag)
        .map(|(_, code)| code.to_string())
        .unwrap_or(tag);

    LANGUAGES.iter().find(|l| {
        l.alpha3 == tag
            || l.alpha3_b == Some(tag.as_str())
            || l.alpha2 == Some(tag.as_str())
            || l.name.to_lowercase() == tag
    })
}

/// Informal spellings that resolve to `code` (e.g. "jp" and "jap" for "jpn").
pub fn aliases_for(code: &str) -> impl Iterator<Item = &'static str> + '_ {
    ALIASES
        .iter()
        .filter(move |(_, target)| *target == code)
        .map(|(alias, _)| *alias)
}

/// Canonicalize a tag to its ISO 639-2/T form.
///
/// Unknown tags pass through trimmed and lowercased.
pub fn standardize(tag: &str) -> String {
    match lookup(tag) {
        Some(l) => l.alpha3.to_string(),
        None => tag.trim().to_lowercase(),
    }
}

/// Whether two tags name the same language.
pub fn same_language(a: &str, b: &str) -> bool {
    standardize(a) == standardize(b)
}

/// English display name for a tag, if known.
pub fn display_name(tag: &str) -> Option<&'static str> {
    lookup(tag).map(|l| l.name)
}

/// ISO 639-1 code for a tag, if it has one.
pub fn to_alpha2(tag: &str) -> Option<&'static str> {
    lookup(tag).and_then(|l| l.alpha2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardize_all_spellings() {
        assert_eq!(standardize("en"), "eng");
        assert_eq!(standardize("ENG"), "eng");
        assert_eq!(standardize("fre"), "fra");
        assert_eq!(standardize("fr"), "fra");
        assert_eq!(standardize("French"), "fra");
        assert_eq!(standardize("ja"), "jpn");
        assert_eq!(standardize("jp"), "jpn");
        assert_eq!(standardize(" ger "), "deu");
    }

    #[test]
    fn unknown_tags_pass_through() {
        assert_eq!(standardize("XYZ"), "xyz");
        assert_eq!(display_name("xyz"), None);
        assert_eq!(to_alpha2("xyz"), None);
    }

    #[test]
    fn same_language_across_forms() {
        assert!(same_language("en", "eng"));
        assert!(same_language("chi", "zh"));
        assert!(!same_language("jpn", "eng"));
    }

    #[test]
    fn display_and_alpha2() {
        assert_eq!(display_name("spa"), Some("Spanish"));
        assert_eq!(to_alpha2("deu"), Some("de"));
        assert_eq!(to_alpha2("fil"), None);
    }

    #[test]
    fn every_alpha3_is_unique() {
        let mut codes: Vec<_> = LANGUAGES.iter().map(|l| l.alpha3).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), LANGUAGES.len());
    }
}
