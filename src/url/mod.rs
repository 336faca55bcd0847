//! URL handling module for Site-Mirror
//!
//! This module provides link normalization, host keys for the mirror tree,
//! and the eligibility filter that decides which discovered URLs are worth
//! enqueuing at all.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::host_key;
pub use filter::EligibilityFilter;
pub use normalize::{normalize, unique};
