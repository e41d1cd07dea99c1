//! HTTP API module for the Appraisal Reconciliation Engine.
//!
//! This module provides the REST API endpoint that reconciles an uploaded
//! roster workbook with an uploaded leave workbook.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{MAX_UPLOAD_BYTES, create_router};
pub use request::{AppraisalQuery, EMPLOYEES_FIELD, LEAVE_FIELD};
pub use response::{ApiError, ApiErrorResponse, AppraisalResponse};
pub use state::AppState;
