#![forbid(unsafe_code)]
//! rankfill-core library.
//!
//! Holds the item model shared by every pipeline stage, the typed errors
//! and their machine codes, run configuration, and the identifier pool.
//!
//! # Conventions
//!
//! - **Errors**: [`error::InferError`] for data errors, `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod ids;
pub mod model;

pub use config::RankfillConfig;
pub use error::{ErrorCode, InferError};
pub use model::{Item, ItemId, ItemKey, ItemSet, ItemSpec, RankRange};
