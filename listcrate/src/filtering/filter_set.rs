//! Per-entity mapping from filter-argument name to predicate.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde_json::{Map, Value as Json};

use super::conditions::compile_field;
use super::fields::FieldDescriptor;
use super::operators::FilterOperator;
use super::scope::Scope;
use crate::ApiError;
use crate::core::hooks::DateConverter;

/// Narrows a scope according to one filter argument's raw value.
pub type Predicate = Arc<dyn Fn(Scope, &Json) -> Result<Scope, ApiError> + Send + Sync>;

/// Value shape a filter argument accepts, for whoever declares the API schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputShape {
    Id,
    IdList,
    String,
    StringList,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
}

/// Externally visible description of one filter argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentSpec {
    pub name: String,
    /// Field the argument was generated for; `None` for custom filters.
    pub field: Option<String>,
    pub operator: Option<FilterOperator>,
    pub shape: InputShape,
}

#[derive(Clone)]
pub struct FilterArgument {
    pub spec: ArgumentSpec,
    pub predicate: Predicate,
}

impl fmt::Debug for FilterArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterArgument")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// A hand-written filter registered next to the generated ones.
///
/// Custom filters are registered last, so one sharing its name with a
/// generated argument replaces it.
///
/// ```rust,ignore
/// CustomFilter::new("search", InputShape::String, |scope, raw| {
///     let term = raw.as_str().unwrap_or_default();
///     Ok(scope.and(build_like_condition("title", term)))
/// })
/// ```
#[derive(Clone)]
pub struct CustomFilter {
    pub name: String,
    pub shape: InputShape,
    pub handler: Predicate,
}

impl CustomFilter {
    pub fn new<F>(name: impl Into<String>, shape: InputShape, handler: F) -> Self
    where
        F: Fn(Scope, &Json) -> Result<Scope, ApiError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            shape,
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for CustomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFilter")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// The compiled filters of one entity. Immutable once built.
#[derive(Clone, Default)]
pub struct FilterSet {
    resource: String,
    arguments: HashMap<String, FilterArgument>,
}

impl FilterSet {
    /// Compile `fields` into predicates and merge `custom_filters` over them.
    ///
    /// Only descriptors flagged `filterable` contribute arguments.
    #[must_use]
    pub fn build(
        resource: &str,
        fields: &[FieldDescriptor],
        custom_filters: Vec<CustomFilter>,
        date_converter: Option<&DateConverter>,
    ) -> Self {
        tracing::debug!(resource, "Generating filter set");

        let mut arguments = HashMap::new();
        for field in fields.iter().filter(|field| field.filterable) {
            for argument in compile_field(field, date_converter) {
                arguments.insert(argument.spec.name.clone(), argument);
            }
        }

        for custom in custom_filters {
            if arguments.contains_key(&custom.name) {
                tracing::debug!(resource, argument = %custom.name, "Custom filter overrides generated argument");
            }
            let argument = FilterArgument {
                spec: ArgumentSpec {
                    name: custom.name.clone(),
                    field: None,
                    operator: None,
                    shape: custom.shape,
                },
                predicate: custom.handler,
            };
            arguments.insert(custom.name, argument);
        }

        tracing::debug!(resource, arguments = arguments.len(), "Filter set ready");
        Self {
            resource: resource.to_string(),
            arguments,
        }
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.arguments.get(name).map(|argument| &argument.predicate)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Argument descriptions, sorted by name.
    #[must_use]
    pub fn arguments(&self) -> Vec<&ArgumentSpec> {
        let mut specs: Vec<&ArgumentSpec> =
            self.arguments.values().map(|argument| &argument.spec).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Run every known argument in `filters` over `scope`.
    ///
    /// Unknown argument names are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a predicate.
    pub fn apply(&self, scope: Scope, filters: &Map<String, Json>) -> Result<Scope, ApiError> {
        filters.iter().try_fold(scope, |scope, (name, raw)| match self.get(name) {
            Some(predicate) => predicate(scope, raw),
            None => {
                tracing::trace!(resource = %self.resource, argument = %name, "Ignoring unknown filter argument");
                Ok(scope)
            }
        })
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.arguments().iter().map(|spec| spec.name.as_str()).collect();
        f.debug_struct("FilterSet")
            .field("resource", &self.resource)
            .field("arguments", &names)
            .finish()
    }
}

/// Memoises one compiled [`FilterSet`] per resource type.
///
/// Lookups take a read lock; a missing entry is built under the write lock
/// after a second check, so concurrent first requests build it exactly once.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    sets: RwLock<HashMap<TypeId, Arc<FilterSet>>>,
}

impl FilterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached filter set for `key`, built with `build` on first use.
    pub fn get_or_build<F>(&self, key: TypeId, build: F) -> Arc<FilterSet>
    where
        F: FnOnce() -> FilterSet,
    {
        if let Some(set) = self
            .sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(set);
        }

        let mut sets = self.sets.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(sets.entry(key).or_insert_with(|| Arc::new(build())))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
