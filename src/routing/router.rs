//! Path classification and route outcome.
//!
//! # Responsibilities
//! - Store the compiled rule chain
//! - Classify a path as root, excluded direct route or locale-prefixed
//! - Run negotiation for the locale-prefixed class only
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) rule scan (acceptable for a handful of excluded routes)
//! - Locale-prefixed is the explicit fall-through, not a rule

use crate::config::{LocaleConfig, RoutingConfig};
use crate::locale::{negotiate, Locale, Negotiation};
use crate::routing::matcher::{ExactPathMatcher, Matcher, PathPrefixMatcher};

/// Routing class of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Root,
    ExcludedDirect,
    LocalePrefixed,
}

impl PathClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::ExcludedDirect => "excluded_direct",
            Self::LocalePrefixed => "locale_prefixed",
        }
    }
}

/// Per-request routing decision, stored in request extensions for handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDecision {
    pub path_class: PathClass,
    pub matched_locale: Option<Locale>,
}

/// What the locale middleware does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Root path; the root redirect handler owns the response.
    Root,
    /// Hand the request on unmodified.
    Continue(RouteDecision),
    /// Send the client to the locale-prefixed path.
    Redirect { location: String },
    /// Resolved locale is outside the supported set.
    NotFound { requested: String },
}

#[derive(Debug)]
struct Rule {
    class: PathClass,
    matcher: Box<dyn Matcher>,
}

/// Compiled locale router.
#[derive(Debug)]
pub struct LocaleRouter {
    rules: Vec<Rule>,
    locale: LocaleConfig,
}

impl LocaleRouter {
    /// Compile the rule chain: root first, then each excluded prefix in order.
    pub fn new(routing: &RoutingConfig, locale: LocaleConfig) -> Self {
        let mut rules = vec![Rule {
            class: PathClass::Root,
            matcher: Box::new(ExactPathMatcher::new("/")),
        }];
        rules.extend(routing.excluded_prefixes.iter().map(|prefix| Rule {
            class: PathClass::ExcludedDirect,
            matcher: Box::new(PathPrefixMatcher::new(prefix.as_str())),
        }));

        Self { rules, locale }
    }

    /// Classify a path. First matching rule wins.
    pub fn classify(&self, path: &str) -> PathClass {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| rule.class)
            .unwrap_or(PathClass::LocalePrefixed)
    }

    /// Full routing outcome for a request.
    pub fn route(
        &self,
        path: &str,
        query: Option<&str>,
        preference: Option<&str>,
        accept_language: Option<&str>,
    ) -> RouteOutcome {
        match self.classify(path) {
            PathClass::Root => RouteOutcome::Root,
            PathClass::ExcludedDirect => RouteOutcome::Continue(RouteDecision {
                path_class: PathClass::ExcludedDirect,
                matched_locale: None,
            }),
            PathClass::LocalePrefixed => {
                match negotiate(path, query, preference, accept_language, &self.locale) {
                    Negotiation::Serve(locale) => RouteOutcome::Continue(RouteDecision {
                        path_class: PathClass::LocalePrefixed,
                        matched_locale: Some(locale),
                    }),
                    Negotiation::Redirect { location, .. } => RouteOutcome::Redirect { location },
                    Negotiation::NotFound { requested } => RouteOutcome::NotFound { requested },
                }
            }
        }
    }

    pub fn locale_config(&self) -> &LocaleConfig {
        &self.locale
    }
}
