//! Permission predicates.
//!
//! A route declares an ordered list of [`Policy`] values. Request-level
//! checks run before the handler touches storage; object-level checks run
//! once the handler has loaded the target and knows its owner.
//!
//! A failing check yields [`Denial::Unauthenticated`] when nobody is logged
//! in and [`Denial::PermissionDenied`] otherwise.

use campusdesk_core::AppError;

use crate::role::Role;

/// The identity resolved from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
    pub is_active: bool,
}

impl Principal {
    fn is_staff(&self) -> bool {
        self.is_active && self.role.is_staff()
    }

    fn is_admin(&self) -> bool {
        self.is_active && self.role.is_admin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// GET, HEAD and OPTIONS.
    Read,
    Write,
}

impl Access {
    pub fn from_method(method: &str) -> Self {
        match method {
            "GET" | "HEAD" | "OPTIONS" => Access::Read,
            _ => Access::Write,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AllowAny,
    IsAuthenticated,
    /// Staff or admin.
    IsAdminUser,
    /// Admin only.
    AdminUser,
    /// Reads for everyone; writes for staff or the owner.
    AdminOrOwner,
    /// Staff or the owner, reads included.
    IsAdminOrOwner,
    /// Reads for everyone; writes for staff or the owner.
    IsOwnerOrReadOnly,
    /// Reads for everyone; writes for staff.
    IsAdminOrReadOnly,
}

impl Policy {
    pub fn has_permission(self, principal: Option<&Principal>, access: Access) -> bool {
        match self {
            Policy::AllowAny => true,
            Policy::IsAuthenticated => principal.is_some_and(|p| p.is_active),
            Policy::IsAdminUser => principal.is_some_and(Principal::is_staff),
            Policy::AdminUser => principal.is_some_and(Principal::is_admin),
            Policy::AdminOrOwner | Policy::IsAdminOrOwner | Policy::IsOwnerOrReadOnly => true,
            Policy::IsAdminOrReadOnly => {
                access == Access::Read || principal.is_some_and(Principal::is_staff)
            }
        }
    }

    /// `owner` is the user id the target object belongs to, if it has one.
    pub fn has_object_permission(
        self,
        principal: Option<&Principal>,
        access: Access,
        owner: Option<i64>,
    ) -> bool {
        let is_staff = principal.is_some_and(Principal::is_staff);
        let is_owner = match (principal, owner) {
            (Some(p), Some(owner)) => p.is_active && p.user_id == owner,
            _ => false,
        };

        match self {
            Policy::AdminOrOwner | Policy::IsOwnerOrReadOnly => {
                access == Access::Read || is_staff || is_owner
            }
            Policy::IsAdminOrOwner => is_staff || is_owner,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated,
    PermissionDenied,
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => {
                AppError::unauthorized("Authentication credentials were not provided.")
            }
            Denial::PermissionDenied => {
                AppError::forbidden("You do not have permission to perform this action.")
            }
        }
    }
}

fn deny(principal: Option<&Principal>) -> Denial {
    match principal {
        None => Denial::Unauthenticated,
        Some(_) => Denial::PermissionDenied,
    }
}

pub fn authorize(
    policies: &[Policy],
    principal: Option<&Principal>,
    access: Access,
) -> Result<(), Denial> {
    if policies
        .iter()
        .all(|policy| policy.has_permission(principal, access))
    {
        Ok(())
    } else {
        Err(deny(principal))
    }
}

pub fn authorize_object(
    policies: &[Policy],
    principal: Option<&Principal>,
    access: Access,
    owner: Option<i64>,
) -> Result<(), Denial> {
    if policies
        .iter()
        .all(|policy| policy.has_object_permission(principal, access, owner))
    {
        Ok(())
    } else {
        Err(deny(principal))
    }
}
