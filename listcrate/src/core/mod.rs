// List resolution: resource metadata, caller hooks and the pipeline itself

pub mod engine;
pub mod hooks;
pub mod traits;

// Re-export commonly used items
pub use engine::{ListConfig, ListEngine};
pub use hooks::{
    ActionAuthorizer, ActionKind, AuthorizeAction, DateConverter, IdentityResolver, ResourceInfo,
    ScopeResolver,
};
pub use traits::{ListResource, RelationSource};
