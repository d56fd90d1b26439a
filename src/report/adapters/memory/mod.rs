//! In-memory adapter for reports.

mod report;

pub use report::InMemoryReportRepository;
