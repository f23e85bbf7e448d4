use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "forums")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Maintained with atomic in-database increments, never read-modify-write.
    pub members_count: i32,
    pub topics_count: i32,
    pub created_by: i32,

    #[sea_orm(has_many)]
    pub members: HasMany<super::forum_member::Entity>,

    #[sea_orm(has_many)]
    pub topics: HasMany<super::forum_topic::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
