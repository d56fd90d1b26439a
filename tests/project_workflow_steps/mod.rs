//! Step definitions shared by the project workflow scenarios.

mod given;
mod then;
mod when;
pub mod world;
