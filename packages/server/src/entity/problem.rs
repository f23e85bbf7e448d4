use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "problems")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Stored lower-cased ("easy", "medium", "hard").
    pub difficulty: String,
    pub category: String,
    /// JSON array of tag strings.
    pub tags: Json,
    #[sea_orm(column_type = "Text")]
    pub starter_code: String,
    #[sea_orm(column_type = "Text")]
    pub solution_code: String,
    pub time_limit_ms: i32,
    pub memory_limit_mb: i32,
    pub points: i32,
    pub is_approved: bool,
    /// User id of the importer, resolved from the caller's token.
    pub created_by: i32,

    #[sea_orm(has_many)]
    pub test_cases: HasMany<super::test_case::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
