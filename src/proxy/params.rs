//! Query parameter sanitization.
//!
//! Inbound `country` and `language` values are coerced onto fixed
//! allow-lists. Anything outside a list becomes the default; the request is
//! never rejected for it.

/// Countries accepted by every provider.
pub const ALLOWED_COUNTRIES: &[&str] = &["in", "us", "gb", "ca", "au", "de", "fr", "es"];

/// Languages accepted by every provider.
pub const ALLOWED_LANGUAGES: &[&str] = &["en", "hi", "es", "fr", "de"];

pub const DEFAULT_COUNTRY: &str = "in";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Raw query string of a news request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsQuery {
    pub country: Option<String>,
    pub language: Option<String>,
    /// GNews spelling of `language`; wins when both are given.
    pub lang: Option<String>,
}

/// Parameters that are safe to embed in an upstream URL.
///
/// Both fields always point into the allow-lists above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedParams {
    pub country: &'static str,
    pub language: &'static str,
}

impl NewsQuery {
    /// Parse a raw query string. Repeated keys keep their first value and
    /// malformed pairs are skipped, so parsing never fails.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = NewsQuery::default();
        let Some(raw) = raw else {
            return query;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "country" => &mut query.country,
                "language" => &mut query.language,
                "lang" => &mut query.lang,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

impl ValidatedParams {
    pub fn from_query(query: &NewsQuery) -> Self {
        let language = query.lang.as_deref().or(query.language.as_deref());
        Self {
            country: validate_country(query.country.as_deref()),
            language: validate_language(language),
        }
    }
}

pub fn validate_country(input: Option<&str>) -> &'static str {
    coerce(input, ALLOWED_COUNTRIES, DEFAULT_COUNTRY)
}

pub fn validate_language(input: Option<&str>) -> &'static str {
    coerce(input, ALLOWED_LANGUAGES, DEFAULT_LANGUAGE)
}

fn coerce(input: Option<&str>, allowed: &[&'static str], default: &'static str) -> &'static str {
    input
        .and_then(|value| allowed.iter().copied().find(|a| *a == value))
        .unwrap_or(default)
}
