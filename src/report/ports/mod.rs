//! Port contracts for report persistence and text generation.

pub mod generator;
pub mod repository;

pub use generator::{GenerationError, GenerationRequest, ReportTextGenerator};
pub use repository::{ReportRepository, ReportRepositoryError, ReportRepositoryResult};
