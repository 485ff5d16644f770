//! Pattern classification and matching for key enumeration
//!
//! Provides the glob dialect used by `KEYS` and a classifier that routes
//! anchored literal patterns onto allocation-free fast paths.

pub mod glob;
pub mod matcher;

pub use glob::*;
pub use matcher::*;
