//! Type-safe wrappers around [`StoreClient`](doc_store::StoreClient), one per collection.
//!
//! Each wrapper maps [`StoreError`](doc_store::StoreError) into its collection's error
//! enum, recovering document rejections so callers can match on them directly.

pub mod agent_client;
pub mod cart_client;
pub mod order_client;

pub use agent_client::*;
pub use cart_client::*;
pub use order_client::*;
pub use doc_store::DocumentClient;
