//! Workforce: multi-tenant task lifecycle backend.
//!
//! Companies publish tasks to their employees; heads and regular users
//! claim and complete them; supervisors verify or reject the results.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle state machine and membership sets
//! - [`identity`]: Read-only user and company directory
//! - [`authorization`]: Role grants for privileged operations
//! - [`config`]: Environment configuration and connection pooling
//! - [`telemetry`]: `tracing` subscriber installation

pub mod authorization;
pub mod config;
pub mod identity;
pub mod task;
pub mod telemetry;
