//! Ordering graph: construction, pruning and whole-graph views.
//!
//! # Overview
//!
//! Edges live on the items themselves (index-based adjacency inside the
//! [`ItemSet`](rankfill_core::ItemSet) arena). This module derives them from
//! the evidence, prunes redundant ones, and projects them into petgraph when
//! a whole-graph algorithm is needed.
//!
//! ## Pipeline
//!
//! ```text
//! ItemSet (sorted, no edges)
//!        ↓  build::build_edges()
//! group-sequence edges + rank chain (acyclic, checked per insertion)
//!        ↓  reduce::reduce_ranked_predecessors()
//! at most one ranked predecessor per item
//!        ↓  order::OrderGraph::from_items()
//! DiGraph projection
//!   ├─ cycles::find_all_cycles()   (Tarjan SCC, diagnostics)
//!   └─ stats::GraphStats           (components, unbounded items)
//! ```
//!
//! ## Change Detection
//!
//! [`order::edge_fingerprint`] is a BLAKE3 hash of the edge set keyed by item
//! identifiers. Two runs over the same evidence produce the same value.

pub mod build;
pub mod cycles;
pub mod order;
pub mod reduce;
pub mod stats;

pub use build::{BuildReport, build_edges};
pub use cycles::{find_all_cycles, would_create_cycle};
pub use order::{OrderGraph, edge_fingerprint};
pub use reduce::{ReduceReport, reduce_ranked_predecessors};
pub use stats::GraphStats;
