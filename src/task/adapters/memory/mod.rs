//! In-memory adapter for tasks.

mod task;

pub use task::InMemoryTaskRepository;
