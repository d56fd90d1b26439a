//! Keystone: the project aggregate rules engine of a project management
//! platform.
//!
//! The crate owns the invariants that span projects, members, tasks and
//! reports:
//!
//! - task keys are issued from an atomic per-project counter and never
//!   repeat;
//! - a project's lead is always one of its members;
//! - reports are synthesised from a deterministic project context, either
//!   by an external text-generation service or by fallback templates.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: pure business rules with no infrastructure dependencies
//! - **Ports**: async trait interfaces for persistence and generation
//! - **Adapters**: in-memory, `PostgreSQL` and HTTP implementations
//! - **Services**: orchestration of domain rules over the ports
//!
//! # Modules
//!
//! - [`project`]: users, projects and membership rules
//! - [`task`]: keyed tasks and identifier allocation
//! - [`report`]: report context, content generation and persistence
//! - [`config`]: environment-driven engine configuration
//! - [`error`]: error classification shared by the service layers

pub mod config;
pub mod error;
pub mod project;
pub mod report;
pub mod task;
