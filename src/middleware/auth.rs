use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use campusdesk_auth::{Access, Denial, Policy, Principal, authorize, authorize_object};
use campusdesk_core::AppError;

use crate::modules::auth::service::AuthService;
use crate::state::AppState;

/// Pulls the bearer token out of the `Authorization` header.
///
/// `Ok(None)` when the header is absent; a header that is present but not a
/// well-formed bearer credential is an error.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header format"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        _ => Err(AppError::unauthorized("Invalid authorization header format")),
    }
}

/// The caller's principal, or `None` for anonymous requests. A bad token is
/// rejected with 401 even though anonymity would have been accepted.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers)? {
            None => Ok(MaybeAuthUser(None)),
            Some(token) => {
                let principal = AuthService::resolve_principal(state, token).await?;
                Ok(MaybeAuthUser(Some(principal)))
            }
        }
    }
}

/// Outcome of a route's request-level policy check, kept so the handler
/// can run the object-level check once it has loaded the target.
#[derive(Debug, Clone, Copy)]
pub struct PolicyGuard {
    pub principal: Option<Principal>,
    pub access: Access,
    policies: &'static [Policy],
}

impl PolicyGuard {
    pub fn check(
        policies: &'static [Policy],
        principal: Option<Principal>,
        access: Access,
    ) -> Result<Self, AppError> {
        authorize(policies, principal.as_ref(), access)?;
        Ok(Self {
            principal,
            access,
            policies,
        })
    }

    /// Object-level check against the user id that owns the target.
    pub fn check_object(&self, owner: Option<i64>) -> Result<(), AppError> {
        authorize_object(self.policies, self.principal.as_ref(), self.access, owner)?;
        Ok(())
    }

    /// The caller, for routes whose policies guarantee one.
    pub fn principal(&self) -> Result<Principal, AppError> {
        self.principal.ok_or_else(|| Denial::Unauthenticated.into())
    }

    pub fn is_staff(&self) -> bool {
        self.principal
            .is_some_and(|p| p.is_active && p.role.is_staff())
    }
}

/// Declares an extractor that enforces an ordered list of [`Policy`]s at
/// request level.
#[macro_export]
macro_rules! require_policy {
    ($name:ident, [$($policy:expr),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub $crate::middleware::auth::PolicyGuard);

        impl $name {
            pub const POLICIES: &'static [campusdesk_auth::Policy] = &[$($policy),+];
        }

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = campusdesk_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let $crate::middleware::auth::MaybeAuthUser(principal) =
                    $crate::middleware::auth::MaybeAuthUser::from_request_parts(parts, state)
                        .await?;
                let access = campusdesk_auth::Access::from_method(parts.method.as_str());
                $crate::middleware::auth::PolicyGuard::check(Self::POLICIES, principal, access)
                    .map($name)
            }
        }
    };
}

require_policy!(RequireAllowAny, [Policy::AllowAny]);
require_policy!(RequireAuthenticated, [Policy::IsAuthenticated]);
require_policy!(RequireStaff, [Policy::IsAdminUser]);
require_policy!(RequireAdmin, [Policy::AdminUser]);
require_policy!(
    RequireStaffOrReadOnly,
    [Policy::IsAuthenticated, Policy::IsAdminOrReadOnly]
);
require_policy!(RequireAdminOrOwner, [Policy::AdminOrOwner]);
require_policy!(
    RequireAuthenticatedAdminOrOwner,
    [Policy::IsAuthenticated, Policy::AdminOrOwner]
);
require_policy!(
    RequireStaffOrSelf,
    [Policy::IsAuthenticated, Policy::IsAdminOrOwner]
);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use campusdesk_auth::Role;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_absent() {
        assert!(matches!(bearer_token(&HeaderMap::new()), Ok(None)));
    }

    #[test]
    fn test_bearer_token_present() {
        let headers = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_malformed() {
        for value in ["Basic xyz", "Bearer ", "abc"] {
            let err = bearer_token(&headers(value)).unwrap_err();
            assert_eq!(err.status.as_u16(), 401, "{value}");
        }
    }

    #[test]
    fn test_policy_guard_object_check() {
        let owner = Principal {
            user_id: 7,
            role: Role::Student,
            is_active: true,
        };
        let guard = PolicyGuard::check(
            RequireAuthenticatedAdminOrOwner::POLICIES,
            Some(owner),
            Access::Write,
        )
        .unwrap();
        assert!(guard.check_object(Some(7)).is_ok());
        assert_eq!(
            guard.check_object(Some(8)).unwrap_err().status.as_u16(),
            403
        );
        assert!(!guard.is_staff());
    }

    #[test]
    fn test_policy_guard_anonymous_write() {
        let err = PolicyGuard::check(RequireStaffOrReadOnly::POLICIES, None, Access::Write)
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }
}
