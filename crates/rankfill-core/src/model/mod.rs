//! The item model: identity, evidence fields, ordering relations, and the
//! per-run annotations written by the inference pipeline.

pub mod item;
pub mod set;

pub use item::{Item, ItemId, ItemKey, ItemSpec, RankRange};
pub use set::{Edge, ItemSet};
