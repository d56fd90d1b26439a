//! Report context: AI-assisted and template-based project reports.
//!
//! A report is built from a plain-text context describing the project, its
//! task statistics and its team. Content comes from an external
//! chat-completions service when configured and from deterministic
//! Markdown templates otherwise.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
