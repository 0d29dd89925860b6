/*
 * Responsibility
 * - GET /me: echo who the presented API key belongs to
 * - Only reachable behind the API key middleware
 */
use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        principal: ctx.principal,
        key_fingerprint: ctx.key_fingerprint,
    })
}
