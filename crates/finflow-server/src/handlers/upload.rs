//! Statement upload handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{AppError, AppState, MAX_UPLOAD_SIZE};
use finflow_core::{ingest::parse_statement_text_with_currency, models::NewTransaction};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub transactions: Vec<NewTransaction>,
}

/// POST /api/upload - Parse uploaded statements
///
/// Expects multipart form with one or more `files` fields (max 10MB in total).
/// Parsed rows are returned for review and are not stored; the client submits
/// the confirmed rows to `POST /api/transactions`.
pub async fn upload_statements(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut total_size = 0usize;
    let mut files = 0usize;
    let mut transactions = Vec::new();

    // Extract fields from multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if !matches!(field.name(), Some("files") | Some("file")) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;
        total_size += bytes.len();

        // Check file size limit
        if total_size > MAX_UPLOAD_SIZE {
            return Err(AppError::payload_too_large(&format!(
                "Upload too large. Maximum size is {} MB",
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        let text = state
            .extractor
            .extract_text(&bytes, filename.as_deref())
            .map_err(AppError::from_core)?;
        let parsed = parse_statement_text_with_currency(&text, &state.default_currency);
        debug!(file = ?filename, rows = parsed.len(), "Parsed uploaded file");

        transactions.extend(parsed);
        files += 1;
    }

    if files == 0 {
        return Err(AppError::bad_request("Missing files field"));
    }

    info!(files, parsed = transactions.len(), "Parsed uploaded statements");
    Ok(Json(UploadResponse { transactions }))
}
