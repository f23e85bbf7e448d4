use serde::{Deserialize, Serialize};

use crate::importer::ImportResult;

/// Import request body. Both fields are checked by the handler rather than by
/// serde so a missing or mistyped field yields the fixed
/// "Missing required fields" rejection instead of a deserializer message.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ImportProblemsRequest {
    /// Client-generated batch identifier. The matching `problem_imports` row
    /// is created by the caller before the import is invoked.
    #[serde(default, rename = "importId")]
    pub import_id: Option<String>,
    /// Sequence of problem records, validated per record rather than up front.
    #[serde(default)]
    pub problems: Option<serde_json::Value>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ImportProblemsResponse {
    pub success: bool,
    pub import_id: String,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Per-record outcomes, in input order.
    pub results: Vec<ImportResult>,
}
