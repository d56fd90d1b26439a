//! Tasks and project-scoped identifier allocation.
//!
//! Every task receives a key of the form `<projectKey>-<n>` when it is
//! created. Keys are unique within a project, issued in creation order and
//! never reused. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
