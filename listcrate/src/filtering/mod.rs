//! # Filter Compilation
//!
//! This module turns field metadata into filter predicates, and applies sort
//! and pagination to a [`Scope`].
//!
//! ## Main Components
//!
//! - **[`FieldDescriptor`]**: name, kind and flags of one entity field
//! - **[`FilterOperator`]**: the operators and their argument-name suffixes
//! - **[`FilterSet`]**: argument name to predicate, built once per entity
//! - **[`FilterRegistry`]**: per-entity cache of built filter sets
//! - **[`apply_sort`]** and **[`window`]**: ordering and offset windows
//!
//! ## Argument Names
//!
//! ```rust,ignore
//! // Equality, inequality, membership
//! { "title": "Hello", "title_ne": "Draft", "id_in": [1, 2, 3] }
//!
//! // Literal, case-insensitive substring
//! { "title_has": "50%" }
//!
//! // Numeric comparisons
//! { "views_gte": 5, "views_lte": 10 }
//!
//! // Date ranges; a midnight upper bound includes the whole day
//! { "published_at_gte": "2024-01-01", "published_at_lte": "2024-01-31" }
//! ```
//!
//! Every argument conjoins exactly one clause, so the order arguments are
//! applied in does not matter. Blank strings and `null` narrow nothing.
//!
//! ## Sorting
//!
//! ```rust,ignore
//! // Descending by views
//! sort=views_desc
//!
//! // Any other suffix is ascending
//! sort=views_asc
//! sort=views_xyz
//! ```

pub mod conditions;
pub mod fields;
pub mod filter_set;
pub mod operators;
pub mod pagination;
pub mod scope;
pub mod search;
pub mod sort;

pub use conditions::{compile_field, normalize_temporal};
pub use fields::{FieldDescriptor, FieldKind, describe_entity, entity_columns};
pub use filter_set::{
    ArgumentSpec, CustomFilter, FilterArgument, FilterRegistry, FilterSet, InputShape, Predicate,
};
pub use operators::FilterOperator;
pub use pagination::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE, PAGE_LIMIT, validate_page, validate_per, window,
};
pub use scope::{Scope, Window};
pub use search::{build_array_element_condition, build_array_like_condition, build_like_condition};
pub use sort::{apply_sort, parse_sort_key, sort_keys};
