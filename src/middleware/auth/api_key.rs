//! API key authentication.
//!
//! `Authorization: ApiKey <key>` -> credential store -> AuthCtx in request extensions.
//!
//! Parsing lives in `services::auth::api_key` and never logs; this layer decides
//! what gets logged and which status the caller sees.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::extract_api_key;
use crate::state::AppState;

/// Apply API key authentication to every route of `router`.
///
/// Example:
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::api_key::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take the State extractor, so pass state explicitly
    router.layer(middleware::from_fn_with_state(state, api_key_middleware))
}

async fn api_key_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = extract_api_key(req.headers()).map_err(|err| {
        tracing::warn!(error = %err, path = %req.uri().path(), "api key extraction failed");
        AppError::from(err)
    })?;

    let principal = state
        .credentials
        .lookup(&api_key)
        .await
        .map_err(|err| {
            tracing::error!(
                error = %err,
                backend = state.credentials.backend_name(),
                "credential lookup failed"
            );
            AppError::from(err)
        })?
        .ok_or_else(|| {
            tracing::warn!(path = %req.uri().path(), "unknown api key");
            AppError::InvalidApiKey
        })?;

    tracing::debug!(
        principal = %principal.name,
        key_fingerprint = %principal.fingerprint,
        "api key accepted"
    );

    // middleware -> extractor hand-off
    req.extensions_mut().insert(AuthCtx::from(principal));

    Ok(next.run(req).await)
}
