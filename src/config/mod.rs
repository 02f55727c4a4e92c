//! Configuration loading and merging
//!
//! Follows `override` references from an entry document up to its root ancestor
//! and deep-merges each child over its parent.

pub mod loader;
pub mod merge;

pub use loader::{load_config, Loader, OverrideChain, OVERRIDE_KEY};
pub use merge::deep_merge;
