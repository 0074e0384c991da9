//! netdev-core — network device counter collection.
//!
//! Provides:
//! - `collector` — device filter, per-platform sources and the counter pipeline
//! - `sink` — metric descriptors, samples and the sinks that consume them

pub mod collector;
pub mod sink;
