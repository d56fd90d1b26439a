//! Unit tests for the task module.

mod allocation_tests;
mod domain_tests;
