use listcrate::{ApiError, CustomFilter, InputShape, ListResource};
use sea_orm::{Condition, Order, entity::prelude::*};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub views: i32,
    pub rating: f64,
    pub published: bool,
    pub author_id: i32,
    pub reviewer_id: Uuid,
    pub deleted: bool,
    pub published_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Articles with soft deletes and id ordering as default scope.
pub struct Articles;

impl ListResource for Articles {
    type EntityType = Entity;
    const RESOURCE_NAME: &'static str = "articles";

    fn filterable_columns() -> Vec<&'static str> {
        vec![
            "id",
            "title",
            "body",
            "views",
            "rating",
            "published",
            "author_id",
            "reviewer_id",
            "published_at",
        ]
    }

    fn text_columns() -> Vec<&'static str> {
        vec!["body"]
    }

    fn default_condition() -> Condition {
        Condition::all().add(Column::Deleted.eq(false))
    }

    fn default_order() -> Vec<(&'static str, Order)> {
        vec![("id", Order::Asc)]
    }
}

/// Same table, with a hand-written `title` filter that pins the result to article 1.
pub struct PinnedArticles;

impl ListResource for PinnedArticles {
    type EntityType = Entity;
    const RESOURCE_NAME: &'static str = "pinned_articles";

    fn filterable_columns() -> Vec<&'static str> {
        Articles::filterable_columns()
    }

    fn custom_filters() -> Vec<CustomFilter> {
        vec![CustomFilter::new(
            "title",
            InputShape::String,
            |scope, _raw| -> Result<listcrate::Scope, ApiError> { Ok(scope.and(Column::Id.eq(1))) },
        )]
    }

    fn default_condition() -> Condition {
        Articles::default_condition()
    }

    fn default_order() -> Vec<(&'static str, Order)> {
        Articles::default_order()
    }
}
