//! Projects, users and the membership rules that bind them.
//!
//! A project always counts its lead among its members. Membership changes,
//! leadership changes and role promotions are applied to the aggregate in
//! memory and persisted with a single project write. The module follows
//! hexagonal architecture:
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
