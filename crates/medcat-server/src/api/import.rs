//! Bulk import: pasted catalogue text in, created products out.
//!
//! The whole batch is validated before anything is written — the first
//! validation failure (in block order) rejects the submission, so a partial
//! import can never happen. Blocks that were too short to parse are reported
//! as diagnostics but do not block the rest.

use axum::extract::State;
use axum::{http::StatusCode, Extension, Json};
use serde::Serialize;

use medcat_core::{first_batch_error, BulkParser};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ImportResponse {
    /// Number of products created; always equals the number of parsed
    /// drafts, since validation is all-or-nothing.
    pub created: usize,
    pub dropped_blocks: Vec<DroppedBlockItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct DroppedBlockItem {
    pub block: usize,
    pub lines: usize,
    pub reason: String,
}

/// POST /api/v1/products/import — parse pasted text and create one product
/// per well-formed, valid block.
pub(super) async fn import_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: String,
) -> Result<(StatusCode, Json<ApiResponse<ImportResponse>>), ApiError> {
    let rid = &req_id.0;

    if body.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "Please enter valid product details text.",
        ));
    }

    // Lenient parse: short blocks become diagnostics, not failures.
    let report = BulkParser::default()
        .parse(&body)
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    if report.drafts.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "No valid products found. Each product needs at least 9 lines.",
        ));
    }

    if let Some(error) = first_batch_error(&report.drafts) {
        return Err(ApiError::new(rid, "validation_error", error));
    }

    let mut created = 0usize;
    for draft in &report.drafts {
        medcat_db::insert_product(&state.pool, draft)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?;
        created += 1;
    }
    tracing::info!(
        created,
        dropped = report.dropped.len(),
        "bulk import finished"
    );

    let dropped_blocks = report
        .dropped
        .iter()
        .map(|d| DroppedBlockItem {
            block: d.index,
            lines: d.lines,
            reason: format!("need at least 9 lines, found {}", d.lines),
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ImportResponse {
                created,
                dropped_blocks,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
