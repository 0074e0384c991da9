//! Network device counter collection.
//!
//! This module turns whatever per-interface statistics the host exposes into
//! a uniform stream of [`CounterTuple`]s and hands them to a metric sink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       NetDevCollector                        │
//! │  ┌──────────────┐   ┌────────────────────┐   ┌────────────┐  │
//! │  │ DeviceFilter │──▶│  NetDevSource      │──▶│  pipeline  │  │
//! │  │ ignore/accept│   │  (producer thread) │   │ bounded(64)│  │
//! │  └──────────────┘   └─────────┬──────────┘   └─────┬──────┘  │
//! │                               │                    │         │
//! │                               │             ┌──────▼──────┐  │
//! │                               │             │ MetricSink  │  │
//! │                               │             │ (consumer)  │  │
//! │                               │             └─────────────┘  │
//! └───────────────────────────────┼──────────────────────────────┘
//!                                 │
//!              ┌──────────────────┼──────────────────┐
//!              │                  │                  │
//!       ┌──────▼──────┐   ┌───────▼───────┐  ┌───────▼───────┐
//!       │ ProcNetDev  │   │ IfaddrsSource │  │ SysctlSource  │
//!       │ (Linux)     │   │ (BSD)         │  │ (macOS)       │
//!       └──────┬──────┘   └───────────────┘  └───────────────┘
//!              │
//!       ┌──────▼──────┐
//!       │  FileSystem │ RealFs / MockFs
//!       └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use netdev_core::collector::{FilterConfig, MockFs, NetDevCollector, ProcNetDev};
//! use netdev_core::sink::MemorySink;
//!
//! let source = ProcNetDev::new(MockFs::net_dev_fixture(), "/proc");
//! let config = FilterConfig::ignore("^veth");
//! let collector = NetDevCollector::new(&config, source).unwrap();
//!
//! let mut sink = MemorySink::new();
//! collector.update(&mut sink).unwrap();
//! assert_eq!(sink.samples().len(), 144);
//! ```

#[allow(clippy::module_inception)]
mod collector;
mod counter;
mod error;
pub mod filter;
pub mod mock;
pub mod native;
pub mod pipeline;
pub mod procfs;
pub mod traits;

pub use collector::NetDevCollector;
#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd"
))]
pub use collector::{PlatformSource, platform_source};
pub use counter::{Counter, CounterStats, CounterTuple};
pub use error::CollectError;
pub use filter::{DeviceFilter, FilterConfig};
pub use mock::MockFs;
pub use procfs::ProcNetDev;
pub use traits::{FileSystem, NetDevSource, RealFs};
