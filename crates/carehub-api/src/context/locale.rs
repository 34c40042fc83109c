//! `Accept-Language` negotiation.

use carehub_core::types::Locale;

/// Locale of the request.
///
/// A `preset` locale, set by an upstream layer as a request extension,
/// wins over the header. Otherwise the first `Accept-Language` entry is
/// used: quality weights are ignored, `_` is accepted as a separator and at most
/// language, region and variant are kept. Anything unusable yields the
/// default locale.
pub fn resolve_locale(preset: Option<&Locale>, accept_language: Option<&str>) -> Locale {
    if let Some(locale) = preset {
        return locale.clone();
    }
    let Some(header) = accept_language else {
        return Locale::default();
    };
    let first = header
        .split(',')
        .next()
        .unwrap_or_default()
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .replace('_', "-");

    let mut parts = first.splitn(3, '-').map(str::trim);
    let language = parts.next().unwrap_or_default();
    if language.is_empty()
        || language == "*"
        || !language.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Locale::default();
    }
    let region = parts.next().filter(|r| !r.is_empty());
    let variant = parts.next().filter(|v| !v.is_empty());
    Locale::new(language, region, variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry_without_quality() {
        let locale = resolve_locale(None, Some("fr-CA;q=0.9, en;q=0.8"));
        assert_eq!(locale.language, "fr");
        assert_eq!(locale.region.as_deref(), Some("CA"));
        assert_eq!(locale.variant, None);
    }

    #[test]
    fn test_underscore_and_variant() {
        let locale = resolve_locale(None, Some("es_es_tradnl"));
        assert_eq!(locale.to_string(), "es-ES-tradnl");
    }

    #[test]
    fn test_malformed_input_falls_back() {
        let headers = [
            None,
            Some(""),
            Some("   "),
            Some(";q=1"),
            Some("-US"),
            Some("*"),
            Some(",en"),
        ];
        for header in headers {
            assert_eq!(resolve_locale(None, header), Locale::default(), "{header:?}");
        }
    }

    #[test]
    fn test_preset_wins_over_header() {
        let preset = Locale::new("de", Some("AT"), None);
        assert_eq!(resolve_locale(Some(&preset), Some("fr-CA")), preset);
        assert_eq!(resolve_locale(Some(&preset), None).to_string(), "de-AT");
    }
}
