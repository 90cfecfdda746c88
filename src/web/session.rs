// Caller identity as handed over by the session gateway.
//
// Authentication happens upstream; the gateway forwards the signed-in user as
// `x-user-id` / `x-user-role`. Requests without them are anonymous, and the
// moderation service turns that into an authorization failure.

use crate::core::safety::{Actor, Role};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor wrapping the core [`Actor`].
#[derive(Debug, Clone)]
pub struct SessionActor(pub Actor);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionActor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let actor = match (header(USER_ID_HEADER), header(USER_ROLE_HEADER)) {
            (Some(id), Some(role)) => Actor::new(id, Role::parse(&role)),
            (Some(id), None) => Actor::new(id, Role::Member),
            _ => Actor::anonymous(),
        };

        Ok(SessionActor(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(headers: &[(&str, &str)]) -> Actor {
        let mut builder = Request::builder().uri("/api/admin/alerts");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        SessionActor::from_request_parts(&mut parts, &())
            .await
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn test_admin_headers() {
        let actor = extract(&[(USER_ID_HEADER, "u1"), (USER_ROLE_HEADER, "ADMIN")]).await;
        assert_eq!(actor, Actor::new("u1", Role::Admin));
        assert!(actor.is_admin());
    }

    #[tokio::test]
    async fn test_missing_role_is_member() {
        let actor = extract(&[(USER_ID_HEADER, "u2")]).await;
        assert_eq!(actor.role, Role::Member);
    }

    #[tokio::test]
    async fn test_no_headers_is_anonymous() {
        let actor = extract(&[]).await;
        assert_eq!(actor, Actor::anonymous());
        assert!(!actor.is_admin());
    }
}
