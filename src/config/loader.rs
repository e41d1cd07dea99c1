//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading appraisal
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};

use super::types::{AppraisalConfig, AppraisalSettings, Field, SheetSpec, SheetsConfig};

/// Loads, validates and provides access to appraisal configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── appraisal.yaml   # Appraisal year, active rule, rule parameters
/// └── sheets.yaml      # Sheet markers and header keywords
/// ```
///
/// # Example
///
/// ```no_run
/// use appraisal_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Appraising {}", loader.config().appraisal_year());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppraisalConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - Any value fails validation (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<AppraisalSettings>(&path.join("appraisal.yaml"))?;
        let sheets = Self::load_yaml::<SheetsConfig>(&path.join("sheets.yaml"))?;

        Self::from_config(AppraisalConfig::new(settings, sheets))
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: AppraisalConfig) -> EngineResult<Self> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppraisalConfig {
        &self.config
    }
}

/// Checks the values the engine relies on.
pub(crate) fn validate(config: &AppraisalConfig) -> EngineResult<()> {
    validate_year(config.appraisal_year())?;

    let sheets = config.sheets();
    if sheets.scan_rows == 0 {
        return Err(invalid("scan_rows", "must be at least 1"));
    }
    validate_sheet("employee", &sheets.employee, &[Field::Id])?;
    validate_sheet("leave", &sheets.leave, &[Field::Id, Field::LeaveTotal])?;

    let leave_rule = &config.settings().leave_hours;
    if leave_rule.leave_hours_per_day <= rust_decimal::Decimal::ZERO {
        return Err(invalid(
            "leave_hours.leave_hours_per_day",
            "must be greater than zero",
        ));
    }

    Ok(())
}

/// Rejects years the date window cannot be built for.
pub(crate) fn validate_year(year: i32) -> EngineResult<()> {
    if !(1900..=9999).contains(&year)
        || NaiveDate::from_ymd_opt(year, 1, 1).is_none()
        || NaiveDate::from_ymd_opt(year, 12, 31).is_none()
    {
        return Err(invalid("appraisal_year", "must be between 1900 and 9999"));
    }
    Ok(())
}

fn validate_sheet(name: &str, spec: &SheetSpec, required: &[Field]) -> EngineResult<()> {
    if spec.sheet_keywords.is_empty() {
        return Err(invalid(
            &format!("{}.sheet_keywords", name),
            "at least one keyword is required",
        ));
    }
    if spec.detection_fields().next().is_none() {
        return Err(invalid(
            &format!("{}.fields", name),
            "at least one field must be marked detect",
        ));
    }
    for field_spec in &spec.fields {
        if field_spec.keywords.is_empty() && field_spec.positional_fallback.is_none() {
            return Err(invalid(
                &format!("{}.fields.{}", name, field_spec.field),
                "needs keywords or a positional_fallback",
            ));
        }
    }
    for field in required {
        if spec.field(*field).is_none() {
            return Err(invalid(
                &format!("{}.fields", name),
                &format!("field '{}' must be configured", field),
            ));
        }
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}
