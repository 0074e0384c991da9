//! Link-layer counters shared by the BSD-family record types.

use crate::collector::counter::{Counter, CounterStats};
use crate::collector::error::CollectError;

/// Counters of one `if_data` style record, widened to `u64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkData {
    pub ipackets: u64,
    pub ierrors: u64,
    pub opackets: u64,
    pub oerrors: u64,
    pub ibytes: u64,
    pub obytes: u64,
    pub imcasts: u64,
    pub omcasts: u64,
    pub iqdrops: u64,
    pub oqdrops: u64,
}

/// Which counters a platform's record type exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkProfile {
    /// FreeBSD and DragonFly: drops in both directions.
    FreeBsd,
    /// OpenBSD: receive drops only.
    OpenBsd,
    /// macOS `if_data64`: no drop counters.
    Darwin,
}

impl LinkProfile {
    /// Returns the exposed counters in emission order.
    pub fn counters(self, data: &LinkData) -> Vec<(Counter, u64)> {
        let mut out = vec![
            (Counter::ReceivePackets, data.ipackets),
            (Counter::TransmitPackets, data.opackets),
            (Counter::ReceiveErrs, data.ierrors),
            (Counter::TransmitErrs, data.oerrors),
            (Counter::ReceiveBytes, data.ibytes),
            (Counter::TransmitBytes, data.obytes),
            (Counter::ReceiveMulticast, data.imcasts),
            (Counter::TransmitMulticast, data.omcasts),
        ];
        match self {
            LinkProfile::FreeBsd => {
                out.push((Counter::ReceiveDrop, data.iqdrops));
                out.push((Counter::TransmitDrop, data.oqdrops));
            }
            LinkProfile::OpenBsd => out.push((Counter::ReceiveDrop, data.iqdrops)),
            LinkProfile::Darwin => {}
        }
        out
    }
}

/// Emits every counter `profile` exposes for one device.
pub fn emit_link(
    device: &str,
    data: &LinkData,
    profile: LinkProfile,
    stats: &CounterStats,
) -> Result<(), CollectError> {
    for (counter, value) in profile.counters(data) {
        stats.add(device, counter, value)?;
    }
    Ok(())
}
