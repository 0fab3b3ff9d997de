//! # listcrate
//!
//! Filter, sort and pagination resolution for list endpoints over Sea-ORM entities.
//!
//! Describe an entity once with [`ListResource`]; the engine generates one
//! filter argument per field and operator (`views_gte`, `title_has`, `id_in`,
//! ...) and resolves each request into a lazy [`Scope`]:
//!
//! ```rust,ignore
//! let engine = ListEngine::new(
//!     ListConfig::new()
//!         .with_authorizer(|action: &AuthorizeAction<'_, Session>| action.ctx.is_active())
//!         .with_scope_resolver(TenantScope),
//! );
//!
//! let request = ListParams {
//!     filter: Some(r#"{"views_gte": 5, "title_has": "rust"}"#.into()),
//!     sort: Some("views_desc".into()),
//!     ..ListParams::default()
//! }
//! .into_request()?;
//!
//! let result = engine.resolve_list::<Articles>(&session, request).await?;
//! let page = fetch_page::<Articles>(&db, result).await?;
//! ```

pub mod core;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod models;

pub use core::{
    ActionAuthorizer, ActionKind, AuthorizeAction, DateConverter, IdentityResolver, ListConfig,
    ListEngine, ListResource, RelationSource, ResourceInfo, ScopeResolver,
};
pub use database::{count_total, fetch_all, fetch_page};
pub use errors::ApiError;
pub use filtering::{
    CustomFilter, FieldDescriptor, FieldKind, FilterOperator, FilterSet, InputShape, Scope,
};
pub use models::{ListParams, ListRequest, ListResult, Page};
