//! Locale model and negotiation.
//!
//! # Data Flow
//! ```text
//! LocalePrefixed request (path, preference cookie, Accept-Language)
//!     → negotiate.rs (path segment → preference → browser → default)
//!     → Negotiation::Serve | Redirect | NotFound
//!
//! Language switch (client initiated):
//!     switcher.rs (swap the active segment in place, or fall back to root)
//! ```

pub mod negotiate;
pub mod switcher;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use negotiate::{negotiate, parse_accept_language, LocaleSource, Negotiation, Resolution};
pub use switcher::switch_locale_path;

/// A supported storefront locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    De,
    En,
}

impl Locale {
    /// Every supported locale.
    pub const ALL: [Locale; 2] = [Locale::De, Locale::En];

    /// Path segment / cookie code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Exact match against a path segment or cookie value.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Match a BCP 47 language tag on its primary subtag, case-insensitively.
    pub fn from_language_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or(tag).trim();
        Self::ALL
            .into_iter()
            .find(|l| primary.eq_ignore_ascii_case(l.code()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for a locale code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}'")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

/// First segment of a path, without the leading slash.
pub(crate) fn first_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    let segment = rest.split('/').next().unwrap_or(rest);
    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}
