//! Runtime orchestration and lifecycle management.
//!
//! - [`DeliverySystem`] - starts the store collections and wires the services on top
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod delivery_system;
pub mod tracing;

pub use delivery_system::*;
pub use tracing::*;
