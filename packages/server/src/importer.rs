//! Batch problem importer.
//!
//! Takes an identified batch of raw problem records, persists each one as a
//! `problems` row plus its `problem_test_cases` rows, and folds per-record
//! outcomes into the batch's `problem_imports` row. One record's failure never
//! aborts the batch and is never retried; the only batch-level failures are
//! the status updates outside the per-record loop.

use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
    TransactionSession, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::entity::problem_import::{self, ImportStatus};
use crate::entity::{problem, test_case};
use crate::identity::Identity;

const DEFAULT_TIME_LIMIT_MS: i32 = 1000;
const DEFAULT_MEMORY_LIMIT_MB: i32 = 128;
const DEFAULT_POINTS: i32 = 100;
const DEFAULT_CATEGORY: &str = "general";

/// Leading test cases marked as samples when the record does not say.
const DEFAULT_SAMPLE_COUNT: usize = 2;

/// One problem in an import payload.
///
/// Only `title`, `description`, and `difficulty` are required; every other
/// field is defaulted on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub starter_code: Option<String>,
    pub solution_code: Option<String>,
    pub time_limit_ms: Option<i32>,
    pub memory_limit_mb: Option<i32>,
    pub points: Option<i32>,
    #[serde(default)]
    pub test_cases: Vec<TestCaseRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseRecord {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
    pub is_sample: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Success,
    Error,
}

/// Per-record outcome, returned to the caller in input order.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ImportResult {
    pub title: String,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ImportOutcome {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ImportResult>,
}

/// Run one import batch to completion.
///
/// The connection is injected by the caller; the importer owns no clients of
/// its own. Records are processed strictly in input order, one at a time.
#[instrument(skip(db, caller, records), fields(import_id = %import_id, total = records.len()))]
pub async fn import_problem_batch<C>(
    db: &C,
    import_id: &str,
    caller: &Identity,
    records: &[serde_json::Value],
) -> Result<ImportOutcome, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    mark_processing(db, import_id).await?;

    let mut results = Vec::with_capacity(records.len());
    for raw in records {
        let title = display_title(raw);
        match import_one(db, caller, raw).await {
            Ok(problem_id) => {
                debug!(problem_id, title = %title, "Imported problem");
                results.push(ImportResult {
                    title,
                    status: RecordStatus::Success,
                    problem_id: Some(problem_id),
                    error: None,
                });
            }
            Err(message) => {
                warn!(title = %title, error = %message, "Problem record failed to import");
                results.push(ImportResult {
                    title,
                    status: RecordStatus::Error,
                    problem_id: None,
                    error: Some(message),
                });
            }
        }
    }

    let successful = results
        .iter()
        .filter(|r| r.status == RecordStatus::Success)
        .count();
    let failed = results.len() - successful;

    mark_completed(db, import_id, successful, failed).await?;

    Ok(ImportOutcome {
        total: results.len(),
        successful,
        failed,
        results,
    })
}

/// Import a single record: problem row plus its test cases, in one
/// transaction. A test-case failure rolls the problem row back, so a problem
/// is never left without its test cases.
async fn import_one<C>(db: &C, caller: &Identity, raw: &serde_json::Value) -> Result<i32, String>
where
    C: ConnectionTrait + TransactionTrait,
{
    let record: ProblemRecord =
        serde_json::from_value(raw.clone()).map_err(|e| format!("Invalid problem record: {e}"))?;

    if !has_required_fields(&record) {
        return Err(format!(
            "Missing required fields for problem: {}",
            display_title(raw)
        ));
    }

    let txn = db.begin().await.map_err(|e| e.to_string())?;
    let now = Utc::now();

    let new_problem = problem::ActiveModel {
        title: Set(record.title.unwrap_or_default().trim().to_string()),
        description: Set(record.description.unwrap_or_default()),
        difficulty: Set(record.difficulty.unwrap_or_default().to_lowercase()),
        category: Set(record
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
        tags: Set(serde_json::json!(record.tags)),
        starter_code: Set(record.starter_code.unwrap_or_default()),
        solution_code: Set(record.solution_code.unwrap_or_default()),
        time_limit_ms: Set(record.time_limit_ms.unwrap_or(DEFAULT_TIME_LIMIT_MS)),
        memory_limit_mb: Set(record.memory_limit_mb.unwrap_or(DEFAULT_MEMORY_LIMIT_MB)),
        points: Set(record.points.unwrap_or(DEFAULT_POINTS)),
        is_approved: Set(true),
        created_by: Set(caller.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = match new_problem.insert(&txn).await {
        Ok(m) => m,
        Err(e) => {
            let _ = txn.rollback().await;
            return Err(e.to_string());
        }
    };

    for (index, tc) in record.test_cases.iter().enumerate() {
        let order_index = match i32::try_from(index) {
            Ok(i) => i,
            Err(_) => {
                let _ = txn.rollback().await;
                return Err("Too many test cases".to_string());
            }
        };
        let new_tc = test_case::ActiveModel {
            input: Set(tc.input.clone()),
            expected_output: Set(tc.expected_output.clone()),
            is_sample: Set(tc.is_sample.unwrap_or(index < DEFAULT_SAMPLE_COUNT)),
            order_index: Set(order_index),
            problem_id: Set(model.id),
            created_at: Set(now),
            ..Default::default()
        };
        if let Err(e) = new_tc.insert(&txn).await {
            let _ = txn.rollback().await;
            return Err(format!("Failed to insert test case {index}: {e}"));
        }
    }

    txn.commit().await.map_err(|e| e.to_string())?;
    Ok(model.id)
}

/// Move the batch row to `processing`. Matching zero rows is not an error:
/// the batch row is created by the caller's side before the import runs.
async fn mark_processing<C: ConnectionTrait>(db: &C, import_id: &str) -> Result<(), DbErr> {
    problem_import::Entity::update_many()
        .col_expr(
            problem_import::Column::Status,
            Expr::value(ImportStatus::Processing),
        )
        .col_expr(problem_import::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(problem_import::Column::Id.eq(import_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Terminal update: always `completed`, with the success count and the
/// failure summary (cleared when everything imported).
async fn mark_completed<C: ConnectionTrait>(
    db: &C,
    import_id: &str,
    successful: usize,
    failed: usize,
) -> Result<(), DbErr> {
    problem_import::Entity::update_many()
        .col_expr(
            problem_import::Column::Status,
            Expr::value(ImportStatus::Completed),
        )
        .col_expr(
            problem_import::Column::ProblemsCount,
            Expr::value(i32::try_from(successful).unwrap_or(i32::MAX)),
        )
        .col_expr(
            problem_import::Column::ErrorMessage,
            Expr::value(failure_summary(failed)),
        )
        .col_expr(problem_import::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(problem_import::Column::Id.eq(import_id))
        .exec(db)
        .await?;
    Ok(())
}

fn failure_summary(failed: usize) -> Option<String> {
    (failed > 0).then(|| format!("{failed} problems failed to import"))
}

fn has_required_fields(record: &ProblemRecord) -> bool {
    [&record.title, &record.description, &record.difficulty]
        .into_iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
}

/// Title used in result entries and error messages. Records without a usable
/// title are reported as "Untitled".
fn display_title(raw: &serde_json::Value) -> String {
    raw.get("title")
        .and_then(|t| t.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled")
        .to_string()
}
