//! Identity records consumed by the task lifecycle core.
//!
//! Users and companies are owned by external CRUD services. This module only
//! exposes the narrow read contract the lifecycle service needs to authorize
//! actions: a user's role and company membership, and whether a company
//! exists. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
