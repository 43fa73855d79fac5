use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use crate::identity::Identity;
use crate::identity::SkipAuthenticate;
use crate::middleware::extract_token;
use crate::state::AuthState;

/// Middleware resolving the caller's identity from a cookie or bearer token.
///
/// Requests the login/logout flow already settled pass through untouched.
/// Every other request comes out annotated with an [`Identity`]: the
/// verified claims when a token checks out, anonymous when the token is
/// missing, expired, not yet valid, tampered with, or invalidated. The
/// distinction is never surfaced to the client, and this layer never
/// fails a request.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<SkipAuthenticate>().is_some()
        || req.extensions().get::<Identity>().is_some()
    {
        return next.run(req).await;
    }

    let identity = match extract_token(req.headers(), &state.config.cookie_name) {
        None => Identity::Anonymous,
        Some(token) => match state.authority.verify(&token).await {
            Ok(claims) => Identity::Authenticated(claims),
            Err(e) => {
                tracing::debug!("Token verification failed: {}", e);
                Identity::Anonymous
            }
        },
    };

    req.extensions_mut().insert(identity);

    next.run(req).await
}
