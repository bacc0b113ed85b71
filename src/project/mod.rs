//! Lifecycle projects for Hatchery.
//!
//! A project walks through the ordered phases of a lifecycle template. This
//! module owns the append-only project history, the phase catalogue, manual
//! project lifecycle operations and the automatic phase advancement sweep.
//! The module follows hexagonal architecture:
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
