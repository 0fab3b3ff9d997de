//! # Request Hooks
//!
//! Extension points the list pipeline calls out to:
//!
//! - **[`ActionAuthorizer`]**: yes/no gate run before anything else
//! - **[`ScopeResolver`]**: narrows the base scope per caller (async, may do I/O)
//! - **[`DateConverter`]**: adjusts midnight date filter values, e.g. into a
//!   caller's time zone
//!
//! ## Usage
//!
//! ```rust,ignore
//! use listcrate::{ApiError, ResourceInfo, Scope, ScopeResolver};
//! use async_trait::async_trait;
//!
//! pub struct TenantScope;
//!
//! #[async_trait]
//! impl ScopeResolver<RequestContext> for TenantScope {
//!     async fn resolve(
//!         &self,
//!         ctx: &RequestContext,
//!         _resource: &ResourceInfo,
//!         base: Scope,
//!     ) -> Result<Scope, ApiError> {
//!         Ok(base.and(Expr::col(Alias::new("tenant_id")).eq(ctx.tenant_id)))
//!     }
//! }
//! ```

use std::any::TypeId;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::ApiError;
use crate::filtering::Scope;

/// Adjusts a midnight date/time filter value before it is bound.
pub type DateConverter = Arc<dyn Fn(NaiveDateTime) -> Result<NaiveDateTime, ApiError> + Send + Sync>;

/// Kind of action an authorizer is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ActionKind {
    List,
}

/// Identifies the entity a request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceInfo {
    pub name: &'static str,
    pub type_id: TypeId,
}

impl ResourceInfo {
    #[must_use]
    pub fn of<R: crate::core::traits::ListResource>() -> Self {
        Self {
            name: R::RESOURCE_NAME,
            type_id: TypeId::of::<R>(),
        }
    }
}

/// Everything an authorizer gets to decide on.
#[derive(Debug)]
pub struct AuthorizeAction<'a, C> {
    pub ctx: &'a C,
    /// Field path of the requested list, outermost first.
    pub path: &'a [String],
    pub action: ActionKind,
    pub resource: ResourceInfo,
}

/// Decides whether a caller may perform an action on a resource.
///
/// Closures taking `&AuthorizeAction<C>` implement this trait.
pub trait ActionAuthorizer<C>: Send + Sync {
    fn authorize(&self, action: &AuthorizeAction<'_, C>) -> bool;
}

impl<C, F> ActionAuthorizer<C> for F
where
    F: Fn(&AuthorizeAction<'_, C>) -> bool + Send + Sync,
{
    fn authorize(&self, action: &AuthorizeAction<'_, C>) -> bool {
        self(action)
    }
}

/// Narrows the base scope of a resource for the current caller.
///
/// Errors are returned to the caller of the pipeline unchanged; no fallback
/// scope is used.
#[async_trait]
pub trait ScopeResolver<C: Send + Sync>: Send + Sync {
    async fn resolve(&self, ctx: &C, resource: &ResourceInfo, base: Scope) -> Result<Scope, ApiError>;
}

/// Resolver that leaves the base scope as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

#[async_trait]
impl<C: Send + Sync> ScopeResolver<C> for IdentityResolver {
    async fn resolve(&self, _ctx: &C, _resource: &ResourceInfo, base: Scope) -> Result<Scope, ApiError> {
        Ok(base)
    }
}
