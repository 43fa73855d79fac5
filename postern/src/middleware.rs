use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderValue;

pub mod authenticate;
pub mod login;
pub mod loginout_check;
pub mod logout;

pub use authenticate::authenticate;
pub use login::login;
pub use loginout_check::loginout_check;
pub use logout::logout;

/// Pulls the access token out of a request: the session cookie when
/// present, otherwise a `Bearer` authorization header.
pub(crate) fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    cookie_token(headers, cookie_name).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name && !value.is_empty()).then(|| value.to_string())
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    (!token.is_empty()).then(|| token.to_string())
}

/// Builds the `Set-Cookie` value carrying a session token.
///
/// No `Max-Age`: the cookie lasts the browser session, and the token's
/// own expiry bounds it server-side. Returns `None` only if the pieces
/// do not form a valid header value.
pub(crate) fn session_cookie(name: &str, token: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax")).ok()
}

/// Builds the `Set-Cookie` value that deletes the session cookie.
pub(crate) fn deletion_cookie(name: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")).ok()
}
