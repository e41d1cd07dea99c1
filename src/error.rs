//! Error types for the Appraisal Reconciliation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that aborts a processing run. Row-level problems
//! (unparseable dates, unparseable leave hours, rows without an identifier)
//! are not errors: they degrade to defaults and surface as audit warnings.

use thiserror::Error;

/// The main error type for the Appraisal Reconciliation Engine.
///
/// # Example
///
/// ```
/// use appraisal_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/appraisal.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/appraisal.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds values the engine cannot work with.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration key.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The workbook bytes could not be decoded into sheets.
    #[error("Failed to decode workbook '{source_name}': {message}")]
    WorkbookDecode {
        /// Which upload the bytes came from (e.g. "employees").
        source_name: String,
        /// The decoder's description of the failure.
        message: String,
    },

    /// No sheet contained a row with all of the required marker keywords.
    #[error(
        "No sheet contains all required keywords [{}] (inspected sheets: [{}])",
        .keywords.join(", "),
        .sheets_inspected.join(", ")
    )]
    SheetNotFound {
        /// The keywords every matching row had to contain.
        keywords: Vec<String>,
        /// Names of the sheets that were scanned.
        sheets_inspected: Vec<String>,
    },

    /// The header row could not be detected within the scan window.
    #[error(
        "Header row not found in sheet '{sheet}' (expected keywords [{}]); first rows: {}",
        .keywords.join(", "),
        .sample_rows.join(" | ")
    )]
    HeaderNotFound {
        /// The sheet that was scanned.
        sheet: String,
        /// The detection keywords that had to appear on one row.
        keywords: Vec<String>,
        /// Rendered copies of the first rows, for diagnosis.
        sample_rows: Vec<String>,
    },

    /// A mandatory column (the identifier) could not be resolved.
    #[error(
        "Mandatory column '{field}' not found in sheet '{sheet}' (keywords [{}])",
        .keywords.join(", ")
    )]
    MissingMandatoryColumn {
        /// The sheet whose header row was searched.
        sheet: String,
        /// The logical field that could not be resolved.
        field: String,
        /// The keywords that were tried.
        keywords: Vec<String>,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
