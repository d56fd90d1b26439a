//! Services for report generation and retrieval.

mod content;
mod synthesis;

pub use content::{
    CONTEXT_PREAMBLE, EMPTY_RESPONSE_CONTENT, GENERATION_FAILURE_PREFIX, ReportContentError,
    ReportContentGenerator, render_fallback,
};
pub use synthesis::{
    AuthorSummary, ProjectSummary, ReportServiceError, ReportServiceResult, ReportStores,
    ReportSynthesisService, ReportView,
};
