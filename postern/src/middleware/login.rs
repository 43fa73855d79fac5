use axum::body::to_bytes;
use axum::body::Body;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use credentials::Claims;
use credentials::PasswordHasher;
use serde::Deserialize;
use serde::Serialize;

use crate::config::TokenTransport;
use crate::identity::Identity;
use crate::identity::SkipAuthenticate;
use crate::middleware::session_cookie;
use crate::responses::ApiError;
use crate::responses::ApiSuccess;
use crate::state::AuthState;

/// Upper bound on the size of a credentials body.
const MAX_CREDENTIALS_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}

/// Middleware handling credential submission on the login path.
///
/// Non-POST requests skip the credential logic entirely: identity is set
/// to anonymous, the request is marked as settled, and the inner handler
/// renders the page. A POST carries a JSON body of `username` and
/// `password`; on a match a fresh token is issued and delivered according
/// to the configured transport. With the cookie transport the inner
/// handler runs with the authenticated identity and the session cookie is
/// appended to its response (the consumed credentials body is replaced
/// with an empty one); with the bearer transport the token is returned in
/// the response body and the inner handler never runs.
///
/// An unknown username and a wrong password produce the same 401.
pub async fn login(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() != Method::POST {
        let (mut parts, body) = req.into_parts();
        parts.extensions.insert(Identity::Anonymous);
        parts.extensions.insert(SkipAuthenticate);

        return Ok(next.run(Request::from_parts(parts, body)).await);
    }

    let (mut parts, body) = req.into_parts();
    let bytes = to_bytes(body, MAX_CREDENTIALS_BYTES)
        .await
        .map_err(|_| ApiError::BadRequest("Could not read credentials".to_string()))?;
    let credentials: LoginRequestBody = serde_json::from_slice(&bytes)
        .map_err(|_| ApiError::BadRequest("Malformed credentials".to_string()))?;

    let user = state
        .users
        .find_credentials("username", &credentials.username)
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Credential lookup failed: {}", e)))?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let hasher = PasswordHasher::new(state.config.hash_scheme);
    let password_matches = hasher
        .verify(&credentials.password, &user.password_hash)
        .map_err(|e| {
            ApiError::InternalServerError(format!("Password verification failed: {}", e))
        })?;

    if !password_matches {
        tracing::warn!(username = %credentials.username, "Login rejected");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let mut claims = Claims::for_user(&user.id, user.username.as_str(), state.token_ttl_hours);
    if let Some(role) = &user.role {
        claims = claims.with_role(role.as_str());
    }

    let token = state
        .authority
        .issue(&claims)
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Token issuance failed: {}", e)))?;

    tracing::info!(username = %user.username, "Login succeeded");

    match state.config.transport {
        TokenTransport::Cookie => {
            parts.extensions.insert(Identity::Authenticated(claims));
            parts.extensions.insert(SkipAuthenticate);

            let req = Request::from_parts(parts, Body::empty());
            let mut response = next.run(req).await;

            match session_cookie(&state.config.cookie_name, &token) {
                Some(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                None => tracing::error!("Could not encode session cookie"),
            }

            Ok(response)
        }
        TokenTransport::Bearer => {
            Ok(ApiSuccess::new(StatusCode::OK, LoginResponseData { token }).into_response())
        }
    }
}
