use listcrate::RelationSource;
use sea_orm::{Condition, entity::prelude::*};

use super::article_entity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl RelationSource for Model {
    fn relation_condition(&self, relation: &str) -> Option<Condition> {
        match relation {
            "articles" => Some(Condition::all().add(article_entity::Column::AuthorId.eq(self.id))),
            _ => None,
        }
    }
}
