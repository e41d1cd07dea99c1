//! HTTP request handlers for the Appraisal Reconciliation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, State, multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::run_appraisal;
use crate::config::{AppraisalConfig, validate_year};
use crate::decode::decode_workbook_async;
use crate::error::EngineResult;

use super::request::{AppraisalQuery, AppraisalUpload, EMPLOYEES_FIELD, LEAVE_FIELD};
use super::response::{ApiError, ApiErrorResponse, AppraisalResponse};
use super::state::AppState;

/// Largest accepted request body, both workbooks together.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/appraisals", post(appraisal_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Handler for POST /appraisals endpoint.
///
/// Accepts the roster and leave workbooks as multipart files and returns
/// the classified roster and quota table.
async fn appraisal_handler(
    State(state): State<AppState>,
    query: Result<Query<AppraisalQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // Correlation ID doubles as the report id
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing appraisal request");
    let start_time = Instant::now();

    match process_request(&state, query, multipart, correlation_id, start_time).await {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                employees = response.report.employees.len(),
                warnings = response.report.audit_trace.warnings.len(),
                duration_us = response.duration_us,
                "Appraisal completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                status = %err.status,
                code = %err.error.code,
                error = %err.error.message,
                "Appraisal failed"
            );
            err.into_response()
        }
    }
}

async fn process_request(
    state: &AppState,
    query: Result<Query<AppraisalQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
    correlation_id: Uuid,
    start_time: Instant,
) -> Result<AppraisalResponse, ApiErrorResponse> {
    let Query(query) = query
        .map_err(|r| ApiErrorResponse::bad_request(ApiError::invalid_query(r.body_text())))?;
    let multipart = multipart
        .map_err(|r| ApiErrorResponse::bad_request(ApiError::malformed_multipart(r.body_text())))?;

    let upload = read_upload(multipart).await?;
    let (employees_name, employees_bytes) = upload
        .employees
        .ok_or_else(|| ApiErrorResponse::bad_request(ApiError::missing_field(EMPLOYEES_FIELD)))?;
    let (leave_name, leave_bytes) = upload
        .leave
        .ok_or_else(|| ApiErrorResponse::bad_request(ApiError::missing_field(LEAVE_FIELD)))?;

    let config = apply_overrides(state.config().config(), &query)?;

    let (employees, leave) = tokio::try_join!(
        decode_workbook_async(employees_name, employees_bytes),
        decode_workbook_async(leave_name, leave_bytes),
    )?;

    let report = run_appraisal(&employees, &leave, &config)?;

    Ok(AppraisalResponse {
        report_id: correlation_id,
        generated_at: Utc::now(),
        duration_us: start_time.elapsed().as_micros() as u64,
        report,
    })
}

/// Collects the two workbook uploads; unknown fields are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<AppraisalUpload, ApiErrorResponse> {
    let mut upload = AppraisalUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiErrorResponse::bad_request(ApiError::malformed_multipart(e.body_text())))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let slot = match name.as_str() {
            EMPLOYEES_FIELD => &mut upload.employees,
            LEAVE_FIELD => &mut upload.leave,
            _ => {
                debug!(field = %name, "Ignoring unknown multipart field");
                continue;
            }
        };
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());
        let bytes = field.bytes().await.map_err(|e| {
            ApiErrorResponse::bad_request(ApiError::malformed_multipart(e.body_text()))
        })?;

        *slot = Some((file_name, bytes.to_vec()));
    }

    Ok(upload)
}

/// Returns a copy of `base` with the query overrides applied.
fn apply_overrides(base: &AppraisalConfig, query: &AppraisalQuery) -> EngineResult<AppraisalConfig> {
    let mut config = base.clone();
    if let Some(year) = query.year {
        validate_year(year)?;
        config = config.with_year(year);
    }
    if let Some(rule) = query.rule {
        config = config.with_rule(rule);
    }
    Ok(config)
}
