use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::Pagination;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProblemListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ProblemListItem {
    pub id: i32,
    pub title: String,
    pub difficulty: String,
    pub category: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemListResponse {
    pub data: Vec<ProblemListItem>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SampleTestCase {
    pub id: i32,
    pub input: String,
    pub expected_output: String,
    pub order_index: i32,
}

/// Full problem details. The reference solution and hidden test cases are
/// never exposed here.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemDetailResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub tags: serde_json::Value,
    pub starter_code: String,
    pub time_limit_ms: i32,
    pub memory_limit_mb: i32,
    pub points: i32,
    pub created_at: DateTime<Utc>,
    pub sample_test_cases: Vec<SampleTestCase>,
}

impl From<crate::entity::test_case::Model> for SampleTestCase {
    fn from(m: crate::entity::test_case::Model) -> Self {
        Self {
            id: m.id,
            input: m.input,
            expected_output: m.expected_output,
            order_index: m.order_index,
        }
    }
}

impl ProblemDetailResponse {
    pub fn from_parts(
        problem: crate::entity::problem::Model,
        samples: Vec<crate::entity::test_case::Model>,
    ) -> Self {
        Self {
            id: problem.id,
            title: problem.title,
            description: problem.description,
            difficulty: problem.difficulty,
            category: problem.category,
            tags: problem.tags,
            starter_code: problem.starter_code,
            time_limit_ms: problem.time_limit_ms,
            memory_limit_mb: problem.memory_limit_mb,
            points: problem.points,
            created_at: problem.created_at,
            sample_test_cases: samples.into_iter().map(Into::into).collect(),
        }
    }
}
