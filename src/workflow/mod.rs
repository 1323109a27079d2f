//! Dispatch workflow and its injected collaborators.

pub mod dispatch;
pub mod location;
pub mod notifier;

pub use dispatch::*;
pub use location::*;
pub use notifier::*;
