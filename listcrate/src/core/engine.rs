//! # List Pipeline
//!
//! [`ListEngine::resolve_list`] turns a [`ListRequest`] into a lazy [`Scope`]:
//!
//! 1. check `page`/`per` bounds and ask the authorizer (skipped for nested lists)
//! 2. build the base scope from the resource defaults, unless `unscope`, and
//!    hand it to the scope resolver
//! 3. narrow by the parent's relation, if any
//! 4. apply filter arguments, then the sort key, then the page window
//!
//! Nothing is executed; see [`crate::database`] for running the result.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::ApiError;
use crate::core::hooks::{
    ActionAuthorizer, ActionKind, AuthorizeAction, DateConverter, IdentityResolver, ResourceInfo,
    ScopeResolver,
};
use crate::core::traits::ListResource;
use crate::filtering::{
    FilterRegistry, FilterSet, Scope, apply_sort, validate_page, validate_per, window,
};
use crate::models::{ListRequest, ListResult};

/// Hooks the engine calls out to. All of them are optional.
pub struct ListConfig<C: Send + Sync> {
    authorizer: Option<Arc<dyn ActionAuthorizer<C>>>,
    scope_resolver: Arc<dyn ScopeResolver<C>>,
    date_converter: Option<DateConverter>,
}

impl<C: Send + Sync> Default for ListConfig<C> {
    fn default() -> Self {
        Self {
            authorizer: None,
            scope_resolver: Arc::new(IdentityResolver),
            date_converter: None,
        }
    }
}

impl<C: Send + Sync> ListConfig<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate top-level list requests. Without one every request is allowed.
    #[must_use]
    pub fn with_authorizer(mut self, authorizer: impl ActionAuthorizer<C> + 'static) -> Self {
        self.authorizer = Some(Arc::new(authorizer));
        self
    }

    /// Narrow base scopes per caller. Without one the base scope is used as is.
    #[must_use]
    pub fn with_scope_resolver(mut self, resolver: impl ScopeResolver<C> + 'static) -> Self {
        self.scope_resolver = Arc::new(resolver);
        self
    }

    /// Adjust midnight date filter values before they are bound.
    #[must_use]
    pub fn with_date_converter(mut self, converter: DateConverter) -> Self {
        self.date_converter = Some(converter);
        self
    }
}

impl<C: Send + Sync> fmt::Debug for ListConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConfig")
            .field("authorizer", &self.authorizer.is_some())
            .field("date_converter", &self.date_converter.is_some())
            .finish()
    }
}

/// Resolves list requests for any [`ListResource`], caching one filter set per resource.
#[derive(Debug)]
pub struct ListEngine<C: Send + Sync> {
    config: ListConfig<C>,
    filter_sets: FilterRegistry,
}

impl<C: Send + Sync + fmt::Debug> ListEngine<C> {
    #[must_use]
    pub fn new(config: ListConfig<C>) -> Self {
        Self {
            config,
            filter_sets: FilterRegistry::new(),
        }
    }

    /// The filter set of `R`, built on first use.
    pub fn filter_set<R: ListResource>(&self) -> Arc<FilterSet> {
        self.filter_sets.get_or_build(TypeId::of::<R>(), || {
            FilterSet::build(
                R::RESOURCE_NAME,
                &R::field_descriptors(),
                R::custom_filters(),
                self.config.date_converter.as_ref(),
            )
        })
    }

    /// Resolve `request` into a lazy scope over `R`.
    ///
    /// # Errors
    ///
    /// - bad request for out-of-range `page`/`per` or wrongly typed filter values
    /// - forbidden when the authorizer denies a top-level request
    /// - whatever the scope resolver returns, unchanged
    pub async fn resolve_list<R: ListResource>(
        &self,
        ctx: &C,
        request: ListRequest<'_>,
    ) -> Result<ListResult, ApiError> {
        let page = validate_page(request.page)?;
        let per = validate_per(request.per)?;
        let resource = ResourceInfo::of::<R>();

        if !self.is_authorized(ctx, &request, resource) {
            tracing::debug!(resource = resource.name, path = ?request.path, "List request denied");
            return Err(ApiError::forbidden(format!(
                "Not allowed to list {}",
                resource.name
            )));
        }

        let mut scope = self.base_scope::<R>(ctx, &resource, request.unscope).await?;

        if let (Some(parent), Some(relation)) = (request.parent, request.relation.as_deref()) {
            match parent.relation_condition(relation) {
                Some(condition) => scope = scope.and(condition),
                None => {
                    tracing::debug!(resource = resource.name, relation, "Parent has no such relation, not narrowing");
                }
            }
        }

        scope = self.filter_set::<R>().apply(scope, &request.filter)?;

        let sortable = R::sortable_columns();
        let sortable: Vec<&str> = sortable.iter().map(String::as_str).collect();
        scope = apply_sort(scope, request.sort.as_deref(), Some(&sortable));
        scope = scope.window(window(page, per));

        Ok(ListResult {
            list: scope,
            total: None,
            page,
        })
    }

    fn is_authorized(&self, ctx: &C, request: &ListRequest<'_>, resource: ResourceInfo) -> bool {
        // nested lists were authorized with their parent
        if request.parent.is_some() {
            return true;
        }
        self.config.authorizer.as_ref().is_none_or(|authorizer| {
            authorizer.authorize(&AuthorizeAction {
                ctx,
                path: &request.path,
                action: ActionKind::List,
                resource,
            })
        })
    }

    async fn base_scope<R: ListResource>(
        &self,
        ctx: &C,
        resource: &ResourceInfo,
        unscope: bool,
    ) -> Result<Scope, ApiError> {
        let base = if unscope {
            Scope::new().unscoped(true)
        } else {
            R::default_order().into_iter().fold(
                Scope::from_condition(R::default_condition()),
                |scope, (column, order)| scope.order_by(column, order),
            )
        };

        let resolver = &self.config.scope_resolver;
        resolver.resolve(ctx, resource, base).await.inspect_err(|err| {
            tracing::error!(
                ctx = ?ctx,
                resource = resource.name,
                error = %err,
                "Scope resolution failed"
            );
        })
    }
}
