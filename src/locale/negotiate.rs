//! Locale negotiation for locale-prefixed paths.
//!
//! # Resolution Order
//! 1. Supported locale already in the first path segment (served as-is)
//! 2. Persisted preference cookie
//! 3. `Accept-Language`, highest quality first
//! 4. Configured default
//!
//! A preference naming a locale outside the supported set is a not-found
//! outcome, never a server error.

use crate::config::LocaleConfig;
use crate::locale::{first_segment, Locale};

/// Where a resolved locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    Path,
    Preference,
    AcceptLanguage,
    Default,
}

impl LocaleSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Preference => "preference",
            Self::AcceptLanguage => "accept_language",
            Self::Default => "default",
        }
    }
}

/// Result of resolving the request's locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Supported(Locale, LocaleSource),
    Unsupported(String),
}

/// What the router does with a locale-prefixed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    /// Path already carries a supported locale.
    Serve(Locale),
    /// Path lacks a locale segment; send the client to the prefixed path.
    Redirect { locale: Locale, location: String },
    /// Resolved locale is not supported.
    NotFound { requested: String },
}

/// Resolve the locale for a request without looking at the path.
pub fn resolve(
    preference: Option<&str>,
    accept_language: Option<&str>,
    config: &LocaleConfig,
) -> Resolution {
    if let Some(pref) = preference.map(str::trim).filter(|p| !p.is_empty()) {
        return match Locale::from_code(pref) {
            Some(locale) => Resolution::Supported(locale, LocaleSource::Preference),
            None => Resolution::Unsupported(pref.to_string()),
        };
    }

    if let Some(locale) = accept_language.and_then(|h| parse_accept_language(h).into_iter().next())
    {
        return Resolution::Supported(locale, LocaleSource::AcceptLanguage);
    }

    Resolution::Supported(config.default_locale, LocaleSource::Default)
}

/// Negotiate a locale-prefixed request.
///
/// `query` is the raw query string without `?`, carried over into redirects.
pub fn negotiate(
    path: &str,
    query: Option<&str>,
    preference: Option<&str>,
    accept_language: Option<&str>,
    config: &LocaleConfig,
) -> Negotiation {
    if let Some(locale) = first_segment(path).and_then(Locale::from_code) {
        return Negotiation::Serve(locale);
    }

    match resolve(preference, accept_language, config) {
        Resolution::Supported(locale, _) => Negotiation::Redirect {
            locale,
            location: prefixed_location(locale, path, query),
        },
        Resolution::Unsupported(requested) => Negotiation::NotFound { requested },
    }
}

fn prefixed_location(locale: Locale, path: &str, query: Option<&str>) -> String {
    let mut location = format!("/{}", locale.code());
    if path != "/" {
        location.push_str(path);
    }
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(q);
    }
    location
}

/// Supported locales from an `Accept-Language` header, best first.
///
/// Entries with `q=0` and the `*` wildcard are dropped; equal weights keep
/// header order. Each locale appears once.
pub fn parse_accept_language(header: &str) -> Vec<Locale> {
    let mut weighted: Vec<(usize, f32, Locale)> = Vec::new();

    for (index, entry) in header.split(',').enumerate() {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or("").trim();
        if tag.is_empty() || tag == "*" {
            continue;
        }
        let quality = parts
            .filter_map(|p| p.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);
        if quality <= 0.0 {
            continue;
        }
        if let Some(locale) = Locale::from_language_tag(tag) {
            weighted.push((index, quality, locale));
        }
    }

    weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut locales = Vec::new();
    for (_, _, locale) in weighted {
        if !locales.contains(&locale) {
            locales.push(locale);
        }
    }
    locales
}
