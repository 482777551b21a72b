//! Identity resolution and authorization extractors.
//!
//! Session and credential issuance belong to the identity provider fronting
//! this service; by the time a request arrives here, the provider has already
//! authenticated it and injected the caller's identity as trusted headers.
//! This module is the single place that turns those headers into an
//! [`Identity`] and decides what a request may see or do.
//!
//! # Extractors
//!
//! - [`RequireAuth`] - any resolved identity; rejects 401 when anonymous
//! - [`RequireAdmin`] - 401 when anonymous, 403 when the role is not `ADMIN`
//! - [`OptionalAuth`] - never rejects
//!
//! # Example
//!
//! ```rust,ignore
//! async fn list_handler(
//!     RequireAuth(identity): RequireAuth,
//! ) -> impl IntoResponse {
//!     let scope = identity.visibility_scope();
//!     // ...
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use uuid::Uuid;

use exship_core::{Email, Role, UserId};

use crate::error::ApiError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-auth-user-id";
/// Header carrying the authenticated user's email.
pub const USER_EMAIL_HEADER: &str = "x-auth-user-email";
/// Header carrying the authenticated user's display name.
pub const USER_NAME_HEADER: &str = "x-auth-user-name";
/// Header carrying the authenticated user's role label.
pub const USER_ROLE_HEADER: &str = "x-auth-user-role";

/// A resolved caller identity.
///
/// Individual fields may be absent - the provider guarantees authentication,
/// not completeness. Authorization decisions therefore never assume an id or
/// email is present; see [`Identity::visibility_scope`].
#[derive(Debug, Clone)]
pub struct Identity {
    /// Identity-provider user id, when supplied.
    pub user_id: Option<UserId>,
    /// Verified email, when supplied and well-formed.
    pub email: Option<Email>,
    /// Display name, when supplied.
    pub name: Option<String>,
    /// Resolved role; defaults to least privilege.
    pub role: Role,
}

/// The implicit filter narrowing a caller's shipment queries.
///
/// Produced only here; repositories consume it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Admin: the unfiltered set.
    All,
    /// Standard user: rows they created, matched by id or normalized email.
    Owner {
        user_id: Option<Uuid>,
        /// Trimmed, lowercased email for case-insensitive matching.
        email: Option<String>,
    },
    /// Standard user with neither id nor email: zero rows, never the full
    /// collection. Filtering fails closed.
    Nothing,
}

impl Identity {
    /// Resolve an identity from request headers.
    ///
    /// Returns `None` (anonymous) when no identity header is present at all.
    /// A malformed id or email is dropped rather than failing the request;
    /// the fail-closed scope handles the degenerate result.
    #[must_use]
    pub fn resolve(headers: &HeaderMap) -> Option<Self> {
        let raw_id = header_str(headers, USER_ID_HEADER);
        let raw_email = header_str(headers, USER_EMAIL_HEADER);
        let raw_name = header_str(headers, USER_NAME_HEADER);
        let raw_role = header_str(headers, USER_ROLE_HEADER);

        if raw_id.is_none() && raw_email.is_none() && raw_name.is_none() && raw_role.is_none() {
            return None;
        }

        Some(Self {
            user_id: raw_id.and_then(|v| UserId::parse(v).ok()),
            email: raw_email.and_then(|v| Email::parse(v).ok()),
            name: raw_name.map(ToOwned::to_owned),
            role: Role::resolve(raw_role),
        })
    }

    /// Whether this identity may perform admin-only operations.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Derive the visibility scope for this identity's shipment queries.
    #[must_use]
    pub fn visibility_scope(&self) -> VisibilityScope {
        if self.role.is_admin() {
            return VisibilityScope::All;
        }

        let email = self.email.as_ref().map(Email::normalized);
        if self.user_id.is_none() && email.is_none() {
            return VisibilityScope::Nothing;
        }

        VisibilityScope::Owner {
            user_id: self.user_id.map(|id| id.as_uuid()),
            email,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Extractor that requires an authenticated identity.
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Identity::resolve(&parts.headers)
            .map(Self)
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))
    }
}

/// Extractor that requires an authenticated identity with the `ADMIN` role.
pub struct RequireAdmin(pub Identity);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::resolve(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))?;

        if !identity.is_admin() {
            return Err(ApiError::Forbidden(
                "administrator role required".to_string(),
            ));
        }

        Ok(Self(identity))
    }
}

/// Extractor that optionally resolves the caller identity.
///
/// Unlike [`RequireAuth`], this never rejects the request.
pub struct OptionalAuth(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Identity::resolve(&parts.headers)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                axum::http::HeaderName::try_from(*k).unwrap(),
                v.parse().unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_resolve_anonymous() {
        assert!(Identity::resolve(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_resolve_full_identity() {
        let map = headers(&[
            (USER_ID_HEADER, "550e8400-e29b-41d4-a716-446655440000"),
            (USER_EMAIL_HEADER, "Ops@Example.com"),
            (USER_NAME_HEADER, "Operations"),
            (USER_ROLE_HEADER, "admin"),
        ]);
        let identity = Identity::resolve(&map).unwrap();
        assert!(identity.user_id.is_some());
        assert_eq!(identity.email.unwrap().as_str(), "Ops@Example.com");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn test_resolve_unknown_role_is_standard() {
        let map = headers(&[
            (USER_EMAIL_HEADER, "user@example.com"),
            (USER_ROLE_HEADER, "manager"),
        ]);
        let identity = Identity::resolve(&map).unwrap();
        assert_eq!(identity.role, Role::Standard);
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_resolve_drops_malformed_fields() {
        let map = headers(&[
            (USER_ID_HEADER, "not-a-uuid"),
            (USER_EMAIL_HEADER, "not-an-email"),
            (USER_ROLE_HEADER, "standard"),
        ]);
        let identity = Identity::resolve(&map).unwrap();
        assert!(identity.user_id.is_none());
        assert!(identity.email.is_none());
    }

    #[test]
    fn test_admin_scope_is_unfiltered() {
        let map = headers(&[(USER_ROLE_HEADER, "ADMIN")]);
        let identity = Identity::resolve(&map).unwrap();
        assert_eq!(identity.visibility_scope(), VisibilityScope::All);
    }

    #[test]
    fn test_owner_scope_normalizes_email() {
        let map = headers(&[(USER_EMAIL_HEADER, " User@Example.COM ")]);
        let identity = Identity::resolve(&map).unwrap();
        match identity.visibility_scope() {
            VisibilityScope::Owner { user_id, email } => {
                assert!(user_id.is_none());
                assert_eq!(email.unwrap(), "user@example.com");
            }
            other => panic!("expected owner scope, got {other:?}"),
        }
    }

    #[test]
    fn test_scope_fails_closed_without_id_or_email() {
        // Authenticated (role header present) but the provider sent neither
        // an id nor a usable email: the scope must yield zero rows.
        let map = headers(&[(USER_ROLE_HEADER, "standard")]);
        let identity = Identity::resolve(&map).unwrap();
        assert_eq!(identity.visibility_scope(), VisibilityScope::Nothing);
    }

    #[tokio::test]
    async fn test_require_auth_rejects_anonymous() {
        let (mut parts, ()) = Request::builder().uri("/api/shipments").body(()).unwrap().into_parts();
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_require_admin_forbids_standard_role() {
        let (mut parts, ()) = Request::builder()
            .uri("/api/admin/users/deleted")
            .header(USER_EMAIL_HEADER, "user@example.com")
            .body(())
            .unwrap()
            .into_parts();
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin() {
        let (mut parts, ()) = Request::builder()
            .uri("/api/admin/users/deleted")
            .header(USER_ROLE_HEADER, "Admin")
            .body(())
            .unwrap()
            .into_parts();
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_optional_auth_never_rejects() {
        let (mut parts, ()) = Request::builder().uri("/api/quotes").body(()).unwrap().into_parts();
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(identity.is_none());
    }
}
