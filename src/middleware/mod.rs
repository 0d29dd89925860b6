/*
 * Responsibility
 * - Public interface of the middleware layers
 * - http: cross-cutting HTTP concerns, auth: API key authentication
 */
pub mod auth;
pub mod http;
