use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::identity::Identity;
use crate::middleware::login::login;
use crate::middleware::logout::logout;
use crate::state::AuthState;

/// Middleware routing session requests by the last path segment.
///
/// A request whose path ends in `login` is handed to [`login`], one
/// ending in `logout` has its identity cleared and is handed to
/// [`logout`], and every other request passes through untouched. This
/// lets a single outer layer serve `/login`, `/api/v1/login` and
/// friends without the application mounting session routes itself.
pub async fn loginout_check(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    match last_segment(req.uri().path()) {
        Some("login") => match login(State(state), req, next).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        },
        Some("logout") => {
            req.extensions_mut().insert(Identity::Anonymous);
            logout(State(state), req, next).await
        }
        _ => next.run(req).await,
    }
}

fn last_segment(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
