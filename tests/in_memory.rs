//! In-memory integration tests across the project, task and report
//! services.
//!
//! Tests are organized into modules by functionality:
//! - `project_lifecycle_tests`: membership, leadership and project removal
//! - `task_key_tests`: key allocation through the task service
//! - `report_pipeline_tests`: report synthesis over real task data
//! - `config_tests`: environment-driven generation settings

mod test_helpers;

mod in_memory {
    pub mod helpers;

    mod config_tests;
    mod project_lifecycle_tests;
    mod report_pipeline_tests;
    mod task_key_tests;
}
