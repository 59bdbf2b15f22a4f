//! Summary and anomaly handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use finflow_core::models::{AnomalyRecord, Summary};

#[derive(Debug, Serialize)]
pub struct AnomaliesResponse {
    pub anomalies: Vec<AnomalyRecord>,
}

/// GET /api/summary - Totals by month and category plus the savings forecast
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Result<Json<Summary>, AppError> {
    let summary = state.analytics().summary()?;
    Ok(Json(summary))
}

/// GET /api/anomalies - Transactions with unusual amounts
pub async fn get_anomalies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnomaliesResponse>, AppError> {
    let anomalies = state.analytics().anomalies()?;
    Ok(Json(AnomaliesResponse { anomalies }))
}
