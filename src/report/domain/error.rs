//! Error types for report domain parsing.

use thiserror::Error;

/// Error returned while parsing a report type name strictly.
///
/// Request handling uses [`super::ReportType::parse_or_custom`] instead,
/// which never fails; strict parsing is for persisted values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown report type: {0}")]
pub struct ParseReportTypeError(pub String);
