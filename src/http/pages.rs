//! Page context handler.
//!
//! Pages themselves are rendered elsewhere; requests that survive locale
//! routing are answered with the resolved locale and path so the renderer
//! can pick the right variant.

use axum::{body::Body, http::Request, Json};
use serde::Serialize;

use crate::locale::Locale;
use crate::routing::{PathClass, RouteDecision};

#[derive(Debug, Serialize)]
pub struct PageContext {
    pub path: String,
    pub class: &'static str,
    pub locale: Option<Locale>,
}

pub async fn page_context(request: Request<Body>) -> Json<PageContext> {
    let decision = request
        .extensions()
        .get::<RouteDecision>()
        .copied()
        .unwrap_or(RouteDecision {
            path_class: PathClass::ExcludedDirect,
            matched_locale: None,
        });

    Json(PageContext {
        path: request.uri().path().to_string(),
        class: decision.path_class.as_str(),
        locale: decision.matched_locale,
    })
}
