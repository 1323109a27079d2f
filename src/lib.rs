//! # Delivery Dispatch
//!
//! > **Dispatch and order-state sync for local goods delivery.**
//!
//! A customer fills a cart and checks out against a pickup point; an operator picks
//! the pickup point for a pending order and dispatches it to one of the nearest
//! delivery agents. This crate is the core behind both: distance ranking, fee
//! computation, and keeping carts and orders consistent with a multi-writer
//! document store.
//!
//! ## 🏗️ Design Notes
//!
//! ### Documents, not rows
//! Carts, orders and agents live in collections of the [`doc_store`] crate: keyed
//! documents with revisions and change feeds, each collection served by its own
//! Tokio task. Every document type says how it validates and how a partial update
//! merges in; the store loop is written once.
//!
//! ### Optimistic carts
//! [`CartSynchronizer`](cart_sync::CartSynchronizer) applies a change locally before
//! it is persisted and undoes it if the write fails or times out. Concurrent edits
//! from several devices are last-write-wins.
//!
//! ### Positions that may not exist
//! A coordinate that was never resolved is a [`Location`](model::Location) with
//! `resolved = false`, never a `(0, 0)` point. Ranking from such a location keeps
//! input order and a fee over it is [`Undetermined`](dispatch::DeliveryFee::Undetermined).
//!
//! ### Rank is not identity
//! A [`RankedAgent`](model::RankedAgent) carries its position in a ranking next to
//! the agent; the agent's id is never rewritten.
//!
//! ## 🗺️ Module Tour
//!
//! - [`geo`], [`dispatch`] - pure math: haversine distance, ranking, fees
//! - [`model`] - the stored documents and their ids
//! - [`cart_actor`], [`order_actor`], [`agent_actor`] - collection rules and errors
//! - [`clients`] - typed handles onto each collection
//! - [`cart_sync`] - local/remote cart reconciliation and checkout
//! - [`workflow`] - pickup selection, candidate ranking and confirmation
//! - [`lifecycle`] - spins up the collections, tracing setup
//! - [`config`] - environment-driven settings
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod agent_actor;
pub mod cart_actor;
pub mod cart_sync;
pub mod clients;
pub mod config;
pub mod dispatch;
pub mod geo;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod workflow;
