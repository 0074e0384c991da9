//! Counter sources for platforms without `/proc/net/dev`.
//!
//! The OS bindings are compiled only on their target. The record layouts
//! they produce ([`LinkData`], [`IfMsghdr2`]), the per-platform choice of
//! counters and the device walks in [`walk`] are plain Rust and tested
//! everywhere.

pub mod link;
pub mod msghdr;
pub mod walk;

#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "openbsd"))]
mod ifaddrs;
#[cfg(target_os = "macos")]
mod sysctl;

#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "openbsd"))]
pub use ifaddrs::IfaddrsSource;
pub use link::{LinkData, LinkProfile, emit_link};
pub use msghdr::{IfMsghdr2, parse_if_msghdr2};
#[cfg(target_os = "macos")]
pub use sysctl::SysctlSource;
pub use walk::{LinkEntry, collect_entries, collect_indexed};
