//! Hatchery: task scheduling engine for aquaculture operations.
//!
//! This crate materialises dated work items for breeding projects and
//! recurring jobs, and advances projects through the ordered phases of
//! their lifecycle templates.
//!
//! # Architecture
//!
//! Hatchery follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`project`]: Lifecycle projects, phase templates, history log and
//!   automatic phase advancement
//! - [`job`]: Recurring jobs and category matching
//! - [`task`]: Task generation, daily orchestration and progress tracking
//! - [`config`]: Scheduler configuration loading
//! - [`telemetry`]: Structured logging setup

mod identifiers;

pub mod config;
pub mod job;
pub mod project;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_support;
