//! Pure data structures stored in the document collections.

pub mod agent;
pub mod cart;
pub mod ids;
pub mod location;
pub mod order;

pub use agent::*;
pub use cart::*;
pub use ids::*;
pub use location::*;
pub use order::*;
