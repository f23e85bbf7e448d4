use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::identity::Identity;
use crate::importer;
use crate::models::import::{ImportProblemsRequest, ImportProblemsResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/import",
    tag = "Problems",
    operation_id = "importProblems",
    summary = "Bulk-import problems with their test cases",
    description = "Processes an identified batch of problem records. Each record is persisted independently; a failing record is reported in `results` without aborting the batch. The batch row in `problem_imports` is moved to `processing` on entry and `completed` on exit.",
    request_body = ImportProblemsRequest,
    responses(
        (status = 200, description = "Batch processed (possibly with per-record failures)", body = ImportProblemsResponse),
        (status = 400, description = "Missing importId or problems sequence", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Batch died outside the per-record loop", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn import_problems(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ImportProblemsRequest>,
) -> Result<Json<ImportProblemsResponse>, AppError> {
    // Auth and shape checks both happen before any persistence.
    let import_id = payload
        .import_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields".into()))?;
    let problems = payload
        .problems
        .as_ref()
        .and_then(|p| p.as_array())
        .ok_or_else(|| AppError::Validation("Missing required fields".into()))?;

    let caller = Identity {
        user_id: auth_user.user_id,
        username: auth_user.username.clone(),
    };

    let outcome = importer::import_problem_batch(&state.db, import_id, &caller, problems)
        .await
        .map_err(|e| AppError::ImportFailed(e.to_string()))?;

    Ok(Json(ImportProblemsResponse {
        success: true,
        import_id: import_id.to_string(),
        total: outcome.total,
        successful: outcome.successful,
        failed: outcome.failed,
        results: outcome.results,
    }))
}
