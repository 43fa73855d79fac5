use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::config::TokenTransport;
use crate::middleware::deletion_cookie;
use crate::middleware::extract_token;
use crate::responses::ApiSuccess;
use crate::state::AuthState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}

/// Middleware ending the caller's session.
///
/// Whatever token the request carries is handed to the invalidation
/// store; a store failure is logged but never blocks the logout, since
/// the client-side credential is discarded regardless. With the cookie
/// transport the response also deletes the session cookie; with the
/// bearer transport discarding the token is the client's job. Responds
/// directly with a confirmation message, never reaching the inner
/// handlers.
pub async fn logout(State(state): State<AuthState>, req: Request, _next: Next) -> Response {
    if let Some(token) = extract_token(req.headers(), &state.config.cookie_name) {
        if let Err(e) = state.authority.invalidate(&token).await {
            tracing::warn!("Failed to invalidate token on logout: {}", e);
        }
    }

    let mut response = ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: "Logged out successfully".to_string(),
        },
    )
    .into_response();

    if state.config.transport == TokenTransport::Cookie {
        match deletion_cookie(&state.config.cookie_name) {
            Some(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            None => tracing::error!("Could not encode cookie deletion header"),
        }
    }

    response
}
