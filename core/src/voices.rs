//! Voice catalog parsing for `say -v ?` output.
//!
//! Each catalog line looks like
//! `Sandy (French (Canada)) fr_CA    # Bonjour! Je m'appelle Sandy.`
//! Lines without a locale token (headers, blanks, noise) are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LOCALE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]{2}_[A-Z]{2}").expect("valid regex"));

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// e.g. `en_US`
    pub locale: String,
    /// Sample sentence shipped with the voice.
    pub example: String,
}

impl Voice {
    pub fn new(
        name: impl Into<String>,
        locale: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
            example: example.into(),
        }
    }

    /// Two-letter language part of the locale.
    pub fn language(&self) -> &str {
        self.locale.split('_').next().unwrap_or_default()
    }
}

/// Parse one catalog line. Returns `None` when it carries no locale token.
pub fn parse_voice_line(line: &str) -> Option<Voice> {
    let m = LOCALE_RE.find(line)?;
    let name = line[..m.start()].trim();
    let rest = line[m.end()..].trim();
    let example = rest.strip_prefix("# ").unwrap_or(rest);
    Some(Voice::new(name, m.as_str(), example))
}

/// Parse catalog output into voices, preserving line order.
pub fn parse_voice_list<I, S>(lines: I) -> Vec<Voice>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_voice_line(line.as_ref()))
        .collect()
}

/// Voices whose locale equals `locale` exactly.
pub fn filter_by_locale(voices: &[Voice], locale: &str) -> Vec<Voice> {
    voices
        .iter()
        .filter(|v| v.locale == locale)
        .cloned()
        .collect()
}

/// Voices whose locale starts with `<lang>_`.
///
/// `language` may be a bare code (`fr`) or a full locale (`fr_CA`); only
/// its first two characters are used.
pub fn filter_by_language(voices: &[Voice], language: &str) -> Vec<Voice> {
    let lang: String = language.chars().take(2).collect();
    let prefix = format!("{}_", lang);
    voices
        .iter()
        .filter(|v| v.locale.starts_with(&prefix))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Alex                en_US    # Most people recognize me by my voice.
Amelie              fr_CA    # Bonjour, je m'appelle Amelie.

Sandy (French (Canada)) fr_CA    # Bonjour! Je m'appelle Sandy.
not a voice line
Anna                de_DE    # Hallo, ich heiße Anna.
";

    #[test]
    fn test_parse_skips_noise() {
        let voices = parse_voice_list(SAMPLE.lines());
        assert_eq!(voices.len(), 4);
        assert_eq!(
            voices[0],
            Voice::new("Alex", "en_US", "Most people recognize me by my voice.")
        );
        assert_eq!(voices[2].name, "Sandy (French (Canada))");
        assert_eq!(voices[3].locale, "de_DE");
    }

    #[test]
    fn test_example_without_marker_kept() {
        let v = parse_voice_line("Fred en_US Hello").unwrap();
        assert_eq!(v.example, "Hello");
        let v = parse_voice_line("Fred en_US").unwrap();
        assert_eq!(v.example, "");
    }

    #[test]
    fn test_only_first_locale_used() {
        let v = parse_voice_line("Bob en_GB # say en_US twice").unwrap();
        assert_eq!(v.locale, "en_GB");
        assert_eq!(v.example, "say en_US twice");
    }

    #[test]
    fn test_filters() {
        let voices = parse_voice_list(SAMPLE.lines());
        let ca = filter_by_locale(&voices, "fr_CA");
        assert_eq!(ca.len(), 2);
        assert!(filter_by_locale(&voices, "fr").is_empty());

        let fr = filter_by_language(&voices, "fr_FR");
        assert_eq!(fr.len(), 2);
        let de = filter_by_language(&voices, "de");
        assert_eq!(de[0].name, "Anna");
        assert_eq!(de[0].language(), "de");
    }
}
