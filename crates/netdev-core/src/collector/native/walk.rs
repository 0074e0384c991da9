//! Device walks shared by the native sources.
//!
//! The OS calls only produce owned lists; deciding which entries count,
//! which devices are skipped and which failures end the cycle happens here.

use std::io;

use tracing::debug;

use crate::collector::counter::CounterStats;
use crate::collector::error::CollectError;
use crate::collector::filter::DeviceFilter;
use crate::collector::native::link::{LinkData, LinkProfile, emit_link};

/// One `getifaddrs` entry, copied out of the OS list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub name: String,
    /// Address family is `AF_LINK`.
    pub link: bool,
    /// Present when the entry carries an `if_data` record.
    pub data: Option<LinkData>,
}

/// Emits the link-layer entries of an address list that pass `filter`.
pub fn collect_entries<I>(
    entries: I,
    profile: LinkProfile,
    filter: &DeviceFilter,
    stats: &CounterStats,
) -> Result<(), CollectError>
where
    I: IntoIterator<Item = LinkEntry>,
{
    for entry in entries {
        if !entry.link {
            continue;
        }
        let Some(data) = entry.data else {
            continue;
        };
        if filter.ignored(&entry.name) {
            debug!("Ignoring device: {}", entry.name);
            continue;
        }
        emit_link(&entry.name, &data, profile, stats)?;
    }
    Ok(())
}

/// Emits every device of an `(index, name)` list that passes `filter`.
///
/// `query` fetches one device's counters and runs only for kept devices.
/// An enumeration error fails the cycle; a failed query skips the device.
pub fn collect_indexed<Q>(
    devices: io::Result<Vec<(u32, String)>>,
    mut query: Q,
    profile: LinkProfile,
    filter: &DeviceFilter,
    stats: &CounterStats,
) -> Result<(), CollectError>
where
    Q: FnMut(u32) -> io::Result<LinkData>,
{
    for (index, name) in devices? {
        if filter.ignored(&name) {
            debug!("Ignoring device: {}", name);
            continue;
        }

        let data = match query(index) {
            Ok(data) => data,
            Err(e) => {
                debug!("failed to load data for interface {:?}: {}", name, e);
                continue;
            }
        };

        emit_link(&name, &data, profile, stats)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::counter::{Counter, CounterTuple};
    use crate::collector::filter::FilterConfig;

    fn run<F>(f: F) -> (Result<(), CollectError>, Vec<CounterTuple>)
    where
        F: FnOnce(&CounterStats) -> Result<(), CollectError>,
    {
        let (tx, rx) = crossbeam_channel::unbounded();
        let stats = CounterStats::new(tx);
        let result = f(&stats);
        drop(stats);
        (result, rx.iter().collect())
    }

    fn data(ibytes: u64) -> LinkData {
        LinkData {
            ibytes,
            ..LinkData::default()
        }
    }

    fn names() -> Vec<(u32, String)> {
        vec![(1, "lo0".into()), (2, "en0".into()), (3, "en1".into())]
    }

    fn devices(tuples: &[CounterTuple]) -> Vec<&str> {
        let mut out: Vec<&str> = tuples.iter().map(|t| t.device.as_str()).collect();
        out.dedup();
        out
    }

    #[test]
    fn test_failed_query_skips_device() {
        let filter = DeviceFilter::default();
        let (result, tuples) = run(|stats| {
            collect_indexed(
                Ok(names()),
                |index| match index {
                    2 => Err(io::Error::new(io::ErrorKind::InvalidData, "short record")),
                    i => Ok(data(u64::from(i) * 100)),
                },
                LinkProfile::Darwin,
                &filter,
                stats,
            )
        });

        result.unwrap();
        assert_eq!(devices(&tuples), vec!["lo0", "en1"]);
        assert_eq!(tuples.len(), 2 * 8);
        let en1 = tuples
            .iter()
            .find(|t| t.device == "en1" && t.counter == Counter::ReceiveBytes)
            .unwrap();
        assert_eq!(en1.value, 300.0);
    }

    #[test]
    fn test_enumeration_error_is_fatal() {
        let filter = DeviceFilter::default();
        let mut queried = false;
        let (result, tuples) = run(|stats| {
            collect_indexed(
                Err(io::Error::from(io::ErrorKind::PermissionDenied)),
                |_| {
                    queried = true;
                    Ok(data(1))
                },
                LinkProfile::Darwin,
                &filter,
                stats,
            )
        });

        assert!(matches!(result, Err(CollectError::SourceUnavailable(_))));
        assert!(tuples.is_empty());
        assert!(!queried);
    }

    #[test]
    fn test_ignored_devices_are_never_queried() {
        let filter = DeviceFilter::new(&FilterConfig::accept("^en")).unwrap();
        let mut queried = Vec::new();
        let (result, tuples) = run(|stats| {
            collect_indexed(
                Ok(names()),
                |index| {
                    queried.push(index);
                    Ok(data(1))
                },
                LinkProfile::Darwin,
                &filter,
                stats,
            )
        });

        result.unwrap();
        assert_eq!(queried, vec![2, 3]);
        assert_eq!(devices(&tuples), vec!["en0", "en1"]);
    }

    #[test]
    fn test_only_link_entries_emitted() {
        let entries = vec![
            LinkEntry {
                name: "em0".into(),
                link: true,
                data: Some(data(5)),
            },
            LinkEntry {
                name: "em0".into(),
                link: false,
                data: Some(data(99)),
            },
            LinkEntry {
                name: "lo0".into(),
                link: true,
                data: None,
            },
            LinkEntry {
                name: "vtnet0".into(),
                link: true,
                data: Some(data(7)),
            },
        ];
        let filter = DeviceFilter::new(&FilterConfig::ignore("^vtnet")).unwrap();
        let (result, tuples) =
            run(|stats| collect_entries(entries, LinkProfile::FreeBsd, &filter, stats));

        result.unwrap();
        assert_eq!(tuples.len(), 10);
        assert!(tuples.iter().all(|t| t.device == "em0"));
        let bytes = tuples
            .iter()
            .find(|t| t.counter == Counter::ReceiveBytes)
            .unwrap();
        assert_eq!(bytes.value, 5.0);
    }

    #[test]
    fn test_closed_sink_stops_walk() {
        let filter = DeviceFilter::default();
        let (tx, rx) = crossbeam_channel::bounded(0);
        drop(rx);
        let stats = CounterStats::new(tx);
        let result = collect_indexed(
            Ok(names()),
            |_| Ok(data(1)),
            LinkProfile::Darwin,
            &filter,
            &stats,
        );
        assert!(matches!(result, Err(CollectError::SinkClosed)));
    }
}
