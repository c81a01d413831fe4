//! Root path handler.
//!
//! `/` always redirects to the marketing route, whatever the locale.

use axum::{extract::State, response::Redirect};

use crate::http::state::AppState;

pub async fn root_redirect(State(state): State<AppState>) -> Redirect {
    let runtime = state.runtime.load();
    Redirect::temporary(&runtime.config.routing.root_redirect)
}
