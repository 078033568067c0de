#![forbid(unsafe_code)]
//! rankfill-infer library.
//!
//! Turns partially ranked items into an ordering graph, layers it, bounds
//! every unranked item, and reports what is left to decide by hand.
//!
//! # Conventions
//!
//! - **Errors**: stages return [`rankfill_core::error::Result`]; the first
//!   contradiction aborts the run.
//! - **Logging**: Use `tracing` macros (`info!` per stage, `debug!` per item).

pub mod candidates;
pub mod chains;
pub mod graph;
pub mod layer;
pub mod pipeline;
pub mod range;

pub use candidates::{CandidateReport, enumerate_candidates};
pub use chains::{AnchorChain, anchor_chains};
pub use layer::{Layering, assign_layers};
pub use pipeline::{Pipeline, RunSummary, infer};
pub use range::{RangeReport, resolve_ranges};
