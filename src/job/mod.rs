//! Recurring jobs for Hatchery.
//!
//! A job is a standalone unit of recurring work that is not tied to a
//! lifecycle phase: it carries a generation interval in days and an
//! optional shop-duty category. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
