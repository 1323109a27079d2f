//! Ranking and billing math: pure functions over coordinates, no I/O.

pub mod fee;
pub mod ranker;

pub use fee::*;
pub use ranker::*;
