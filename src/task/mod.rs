//! Dated work items for Hatchery.
//!
//! Tasks are materialised from the task templates of a project phase or a
//! recurring job for one due date at a time, then worked through by
//! operators. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Generation, orchestration and progress services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
