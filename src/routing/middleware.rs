//! Locale routing middleware.
//!
//! Wraps page routes only; `/api` is mounted outside this layer.

use axum::{
    body::Body,
    extract::State,
    http::{header::ACCEPT_LANGUAGE, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::http::state::AppState;
use crate::observability::metrics;
use crate::routing::router::RouteOutcome;

pub async fn locale_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let runtime = state.runtime.load_full();

    let preference = jar
        .get(&runtime.config.locale.preference_cookie)
        .map(|c| c.value().to_string());
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let uri = request.uri();
    let outcome = runtime.router.route(
        uri.path(),
        uri.query(),
        preference.as_deref(),
        accept_language.as_deref(),
    );

    match outcome {
        RouteOutcome::Root => {
            metrics::record_route_decision("root", "deferred");
            next.run(request).await
        }
        RouteOutcome::Continue(decision) => {
            metrics::record_route_decision(decision.path_class.as_str(), "continue");
            tracing::trace!(
                path = %request.uri().path(),
                class = decision.path_class.as_str(),
                locale = ?decision.matched_locale,
                "Route decided"
            );
            request.extensions_mut().insert(decision);
            next.run(request).await
        }
        RouteOutcome::Redirect { location } => {
            metrics::record_route_decision("locale_prefixed", "redirect");
            tracing::debug!(path = %request.uri().path(), location = %location, "Redirecting to localized path");
            Redirect::temporary(&location).into_response()
        }
        RouteOutcome::NotFound { requested } => {
            metrics::record_route_decision("locale_prefixed", "not_found");
            tracing::debug!(path = %request.uri().path(), requested = %requested, "Unsupported locale");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
