/*
 * Responsibility
 * - Response DTO for GET /me
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal: String,
    pub key_fingerprint: String,
}
