use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_title};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateForumRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTopicRequest {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ForumListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TopicListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct ForumResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub members_count: i32,
    pub topics_count: i32,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ForumListResponse {
    pub data: Vec<ForumResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ForumMemberResponse {
    pub user_id: i32,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TopicResponse {
    pub id: i32,
    pub forum_id: i32,
    pub title: String,
    pub content: String,
    pub author_id: i32,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TopicListResponse {
    pub data: Vec<TopicResponse>,
    pub pagination: Pagination,
}

impl From<crate::entity::forum::Model> for ForumResponse {
    fn from(m: crate::entity::forum::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            members_count: m.members_count,
            topics_count: m.topics_count,
            created_by: m.created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<crate::entity::forum_member::Model> for ForumMemberResponse {
    fn from(m: crate::entity::forum_member::Model) -> Self {
        Self {
            user_id: m.user_id,
            username: m.username,
            joined_at: m.joined_at,
        }
    }
}

impl From<crate::entity::forum_topic::Model> for TopicResponse {
    fn from(m: crate::entity::forum_topic::Model) -> Self {
        Self {
            id: m.id,
            forum_id: m.forum_id,
            title: m.title,
            content: m.content,
            author_id: m.author_id,
            author_name: m.author_name,
            created_at: m.created_at,
        }
    }
}

pub fn validate_create_forum(req: &CreateForumRequest) -> Result<(), AppError> {
    let name = req.name.trim();
    if name.is_empty() || name.chars().count() > 128 {
        return Err(AppError::Validation("Name must be 1-128 characters".into()));
    }
    if req.description.chars().count() > 4096 {
        return Err(AppError::Validation(
            "Description must be at most 4096 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_topic(req: &CreateTopicRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    if req.content.trim().is_empty() || req.content.len() > 65_536 {
        return Err(AppError::Validation(
            "Content must be non-empty and at most 64KiB".into(),
        ));
    }
    Ok(())
}
