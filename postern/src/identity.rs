use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use credentials::Claims;

/// Per-request resolved user, stored in request extensions.
///
/// Attached by the authenticate layer (or by a successful cookie login)
/// before the inner handlers run. Handlers read it through the
/// [`FromRequestParts`] extractor; a request that never went through the
/// pipeline extracts as [`Identity::Anonymous`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated(Claims),
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    /// Returns the verified claims, if any.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(claims) => Some(claims),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Identity>()
            .cloned()
            .unwrap_or(Identity::Anonymous))
    }
}

/// Marker telling the authenticate layer that this request's identity was
/// already settled earlier in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipAuthenticate;

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    #[tokio::test]
    async fn test_extracting_without_annotation_yields_anonymous() {
        let (mut parts, _) = Request::new(()).into_parts();

        let identity = Identity::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(identity, Identity::Anonymous);
    }

    #[tokio::test]
    async fn test_extracting_returns_attached_identity() {
        let claims = Claims::for_user("42", "alice", 1);
        let (mut parts, _) = Request::new(()).into_parts();
        parts
            .extensions
            .insert(Identity::Authenticated(claims.clone()));

        let identity = Identity::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(identity.claims(), Some(&claims));
        assert!(!identity.is_anonymous());
    }
}
