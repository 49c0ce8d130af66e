//! `erha-auth` — role-based authorization for the operations backend.
//!
//! Pure policy: no HTTP, no storage. The role → permission table is built once
//! and shared read-only through [`AuthorizationResolver`].

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod policy;
pub mod principal;
pub mod registry;
pub mod resolver;
pub mod roles;

pub use authorize::{
    AuthorizationExplanation, AuthzError, CommandAuthorization, authorize, authorize_any,
    authorize_command, explain_authorization,
};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use permissions::{Permission, PermissionCategory};
pub use policy::{RolePermissionMap, RolePermissionMapBuilder};
pub use principal::{Principal, PrincipalId};
pub use registry::RbacRegistry;
pub use resolver::AuthorizationResolver;
pub use roles::Role;
