//! Appraisal Reconciliation Engine
//!
//! This crate reconciles an employee roster export with a leave-hours
//! export, classifies each employee into an appraisal category for a fixed
//! calendar year, and allocates per-category tier quotas.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod decode;
pub mod error;
pub mod models;
