//! KeyCache - in-memory keyspace index for pattern-based key enumeration
//!
//! This crate mirrors the live key set of a Redis-compatible storage engine
//! so that `KEYS <pattern>` can be answered from memory instead of iterating
//! the durable meta index under compaction pressure. It provides:
//! - Presence and expiry indices with lazy TTL eviction
//! - A glob pattern matcher with literal fast paths
//! - A concurrent wrapper (readers-writer lock plus a dedicated sweep mutex)
//! - A bootstrap loader that rebuilds the cache from the engine's meta keyspace

pub mod bootstrap;
pub mod cache;
pub mod clock;
pub mod config;
pub mod pattern;

pub use bootstrap::*;
pub use cache::*;
pub use config::*;
pub use pattern::*;
