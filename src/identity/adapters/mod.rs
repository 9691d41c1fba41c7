//! Adapter implementations for the identity directory port.

pub mod memory;
pub mod postgres;
