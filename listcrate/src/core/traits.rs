use sea_orm::{Condition, EntityTrait, Order};

use crate::filtering::{CustomFilter, FieldDescriptor, describe_entity, entity_columns};

/// Per-entity metadata the list pipeline is generated from.
///
/// ```rust,ignore
/// pub struct Articles;
///
/// impl ListResource for Articles {
///     type EntityType = article::Entity;
///     const RESOURCE_NAME: &'static str = "articles";
///
///     fn filterable_columns() -> Vec<&'static str> {
///         vec!["id", "title", "views", "published_at"]
///     }
///
///     fn default_condition() -> Condition {
///         Condition::all().add(article::Column::Deleted.eq(false))
///     }
/// }
/// ```
pub trait ListResource: Send + Sync + 'static {
    type EntityType: EntityTrait;

    const RESOURCE_NAME: &'static str;

    /// Columns that get generated filter arguments.
    #[must_use]
    fn filterable_columns() -> Vec<&'static str> {
        Vec::new()
    }

    /// Free-text columns; these only get the `_has` argument.
    #[must_use]
    fn text_columns() -> Vec<&'static str> {
        Vec::new()
    }

    /// Columns a sort key may name. Defaults to every column of the entity.
    #[must_use]
    fn sortable_columns() -> Vec<String> {
        entity_columns::<Self::EntityType>()
    }

    /// Field metadata, read from the Sea-ORM column definitions by default.
    #[must_use]
    fn field_descriptors() -> Vec<FieldDescriptor> {
        describe_entity::<Self::EntityType>(&Self::filterable_columns(), &Self::text_columns())
    }

    /// Hand-written filters; these override generated ones of the same name.
    #[must_use]
    fn custom_filters() -> Vec<CustomFilter> {
        Vec::new()
    }

    /// Default scoping rule (soft deletes and the like), suspended by `unscope`.
    #[must_use]
    fn default_condition() -> Condition {
        Condition::all()
    }

    /// Default ordering, suspended by `unscope`.
    #[must_use]
    fn default_order() -> Vec<(&'static str, Order)> {
        Vec::new()
    }
}

/// A parent record that nested lists can be narrowed by.
pub trait RelationSource: Send + Sync {
    /// Selector of the records related to this parent under `relation`, or
    /// `None` when no such relation exists.
    fn relation_condition(&self, relation: &str) -> Option<Condition>;
}
