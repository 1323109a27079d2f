//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `fmt` subscriber filtered by `RUST_LOG`.
//! Module paths are hidden; the store logs a `collection` field instead.
//!
//! ```bash
//! RUST_LOG=info cargo run     # one line per write, checkout and assignment
//! RUST_LOG=debug cargo run    # adds every request, stale snapshots, busy skips
//! RUST_LOG=doc_store=debug,delivery_dispatch=info cargo run
//! ```
//!
//! With `RUST_LOG=info` a checkout followed by a dispatch reads roughly:
//!
//! ```text
//! INFO Store started collection="carts"
//! INFO Updated collection="carts" id=user-1 revision=1
//! INFO checkout: Order placed total=70.00
//! INFO checkout: Deleted collection="carts" id=user-1 revision=2
//! INFO confirm: Order assigned to agent order_id=… agent_id=agent-2
//! ```

/// Installs the global subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
