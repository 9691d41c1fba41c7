//! Task lifecycle management.
//!
//! Companies publish tasks, offer them to a set of users, and move them
//! through `Available → InProgress → Completed → Verified`, with rejection
//! sending completed work back to `InProgress`. Membership lives in a
//! paired task operation: the access set says who may claim a task, the
//! executor set says who is working on it. The module follows hexagonal
//! architecture:
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
