use axum::extract::Request;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::config::AuthConfig;

/// Builds a permanent redirect to the configured login page.
///
/// The `Location` target is always assembled with the `http` scheme,
/// regardless of how the original request arrived. Deployments serving
/// HTTPS directly get an insecure redirect target out of this; put the
/// scheme rewrite in the TLS-terminating proxy if that matters.
pub fn redirect_to_login(request: &Request, config: &AuthConfig) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let location = format!("http://{}{}", host, config.login_path);

    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}
