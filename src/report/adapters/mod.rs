//! Adapter implementations for report persistence and generation.

pub mod http;
pub mod memory;
pub mod postgres;
