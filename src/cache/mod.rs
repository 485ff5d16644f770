//! Keyspace cache: presence and expiry indices, lazy TTL sweeper, and the
//! concurrent wrapper shared by all worker threads

pub mod concurrent;
pub mod entry;
pub mod key_cache;

pub use concurrent::*;
pub use entry::*;
pub use key_cache::*;
