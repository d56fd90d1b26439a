//! Adapter implementations for project and user persistence.

pub mod memory;
pub mod postgres;
