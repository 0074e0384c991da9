//! Text-format source reading `/proc/net/dev`.

use std::path::Path;

use tracing::{debug, trace};

use crate::collector::counter::CounterStats;
use crate::collector::error::CollectError;
use crate::collector::filter::DeviceFilter;
use crate::collector::procfs::parser::{ParseError, device_lines, parse_net_dev_line};
use crate::collector::traits::{FileSystem, NetDevSource};

/// Collects network device counters from `<proc_path>/net/dev`.
pub struct ProcNetDev<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> ProcNetDev<F> {
    /// Creates a new `/proc/net/dev` source.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }
}

impl<F: FileSystem> NetDevSource for ProcNetDev<F> {
    /// Streams every accepted device's 16 counters, line by line.
    ///
    /// A malformed line aborts the traversal; nothing after it is emitted.
    fn collect(&self, filter: &DeviceFilter, stats: &CounterStats) -> Result<(), CollectError> {
        let path = format!("{}/net/dev", self.proc_path);
        let raw = self.fs.read(Path::new(&path))?;
        let content = String::from_utf8_lossy(&raw);

        let mut devices = 0usize;
        for (line_no, line) in device_lines(&content) {
            let dev = parse_net_dev_line(line).map_err(|e| {
                ParseError::new(format!("{} line {}: {}", path, line_no, e.message))
            })?;

            if filter.ignored(&dev.interface) {
                debug!("Ignoring device: {}", dev.interface);
                continue;
            }

            for (counter, value) in dev.counters() {
                stats.add(&dev.interface, counter, value)?;
            }
            devices += 1;
        }

        trace!("{}: {} devices reported", path, devices);
        Ok(())
    }
}
