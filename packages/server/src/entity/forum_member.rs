use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "forum_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub forum_id: i32,
    #[sea_orm(primary_key)]
    pub user_id: i32,

    #[sea_orm(belongs_to, from = "forum_id", to = "id")]
    pub forum: HasOne<super::forum::Entity>,

    /// Display name snapshot taken from the verified token at join time.
    /// Identity itself lives in the external auth service.
    pub username: String,

    pub joined_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
