/*
 * Responsibility
 * - URL layout of v1
 * - Decide which routes sit behind the API key middleware
 *   (public: /health, protected: everything else)
 */
use axum::{Router, routing::get};

use crate::middleware::auth::api_key;
use crate::state::AppState;

use crate::api::v1::handlers::{health::health, me::me};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = api_key::apply(Router::new().route("/me", get(me)), state);

    public.merge(protected)
}
