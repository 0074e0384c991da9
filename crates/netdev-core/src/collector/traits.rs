//! Seams between the collector and the host.
//!
//! `FileSystem` lets the text-format source read from the real `/proc` or
//! from an in-memory mock. `NetDevSource` is the capability every platform
//! adapter implements.

use std::io;
use std::path::Path;

use crate::collector::counter::CounterStats;
use crate::collector::error::CollectError;
use crate::collector::filter::DeviceFilter;

/// Abstraction for filesystem reads.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as raw bytes.
    ///
    /// Interface names are not guaranteed to be UTF-8, so callers decide how
    /// to decode.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// A source of per-device network counters.
///
/// One implementation exists per platform family. A call to `collect` is a
/// single, non-restartable traversal: it emits a tuple through `stats` for
/// every counter of every device the filter keeps, and returns the first
/// fatal error it meets.
pub trait NetDevSource: Send + Sync {
    fn collect(&self, filter: &DeviceFilter, stats: &CounterStats) -> Result<(), CollectError>;
}
