//! Language switch endpoint.
//!
//! `GET /api/locale/switch?to=<code>&path=<current>&active=<code>` persists the
//! chosen locale as the preference cookie and redirects to the current page in
//! the new locale.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;

use crate::http::state::AppState;
use crate::locale::{first_segment, switch_locale_path, Locale};

#[derive(Debug, Deserialize)]
pub struct SwitchQuery {
    pub to: String,
    pub path: Option<String>,
    pub active: Option<String>,
}

pub async fn switch_locale(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<SwitchQuery>,
) -> Response {
    let runtime = state.runtime.load_full();
    let locale_config = &runtime.config.locale;

    let Some(target) = Locale::from_code(&query.to) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unsupported locale '{}'", query.to) })),
        )
            .into_response();
    };

    // Only same-origin absolute paths that fit in a Location header;
    // `//host` would be an open redirect.
    let current = query
        .path
        .filter(|p| {
            p.starts_with('/')
                && !p.starts_with("//")
                && !p.contains('\\')
                && !p.chars().any(char::is_control)
        })
        .unwrap_or_else(|| "/".to_string());

    let active = query
        .active
        .as_deref()
        .and_then(Locale::from_code)
        .or_else(|| first_segment(&current).and_then(Locale::from_code))
        .or_else(|| {
            jar.get(&locale_config.preference_cookie)
                .and_then(|c| Locale::from_code(c.value()))
        })
        .unwrap_or(locale_config.default_locale);

    let location = switch_locale_path(&current, active, target);
    tracing::debug!(from = %active, to = %target, location = %location, "Switching locale");

    let cookie = Cookie::build((locale_config.preference_cookie.clone(), target.code()))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent()
        .build();

    (jar.add(cookie), Redirect::to(&location)).into_response()
}
