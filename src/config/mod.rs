//! Configuration loading and management for the Appraisal Reconciliation Engine.
//!
//! This module provides functionality to load appraisal configurations from
//! YAML files: the appraised year, the active classification rule and its
//! parameters, and the keyword layouts used to find sheets and headers.
//!
//! # Example
//!
//! ```no_run
//! use appraisal_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Active rule: {}", loader.config().active_rule());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub(crate) use loader::validate_year;
pub use types::{
    AppraisalConfig, AppraisalSettings, Field, FieldSpec, KeywordMatchMode, LeaveHoursRuleConfig,
    RuleSetKind, ServiceDaysRuleConfig, SheetSpec, SheetsConfig,
};
