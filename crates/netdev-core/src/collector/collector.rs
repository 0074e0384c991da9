//! Collector that runs one filtered source through the pipeline.

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::filter::{DeviceFilter, FilterConfig};
use crate::collector::pipeline::run_cycle;
use crate::collector::traits::NetDevSource;
use crate::sink::{DescriptorCache, MetricSink, Sample};

#[cfg(target_os = "linux")]
use crate::collector::{procfs::ProcNetDev, traits::RealFs};

/// Source used on the build target.
#[cfg(target_os = "linux")]
pub type PlatformSource = ProcNetDev<RealFs>;
#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "openbsd"))]
pub type PlatformSource = crate::collector::native::IfaddrsSource;
#[cfg(target_os = "macos")]
pub type PlatformSource = crate::collector::native::SysctlSource;

/// Creates the build target's source.
///
/// `proc_path` is only used where counters come from `/proc/net/dev`.
#[cfg(target_os = "linux")]
pub fn platform_source(proc_path: &str) -> PlatformSource {
    ProcNetDev::new(RealFs::new(), proc_path)
}

#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "openbsd"))]
pub fn platform_source(_proc_path: &str) -> PlatformSource {
    crate::collector::native::IfaddrsSource::new()
}

#[cfg(target_os = "macos")]
pub fn platform_source(_proc_path: &str) -> PlatformSource {
    crate::collector::native::SysctlSource::new()
}

/// Network device collector.
///
/// Holds the immutable filter, one source and the descriptor cache. `update`
/// takes `&self`, so overlapping cycles may share one collector.
pub struct NetDevCollector<S: NetDevSource> {
    filter: DeviceFilter,
    source: S,
    descs: DescriptorCache,
}

impl<S: NetDevSource> NetDevCollector<S> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `config` - Device filter patterns (at most one may be set)
    /// * `source` - Platform counter source
    pub fn new(config: &FilterConfig, source: S) -> Result<Self, CollectError> {
        let filter = DeviceFilter::new(config)?;
        debug!("netdev filter: {:?}", config);
        Ok(Self {
            filter,
            source,
            descs: DescriptorCache::new(),
        })
    }

    /// Returns the descriptor cache.
    pub fn descriptors(&self) -> &DescriptorCache {
        &self.descs
    }

    /// Runs one collection cycle, feeding every sample into `sink`.
    ///
    /// Returns the source's fatal error, if any, once the sink has seen every
    /// sample produced before it.
    pub fn update<K: MetricSink>(&self, sink: &mut K) -> Result<(), CollectError> {
        run_cycle(
            |stats| self.source.collect(&self.filter, stats),
            |tuple| {
                sink.emit(Sample {
                    desc: self.descs.get(tuple.counter),
                    device: tuple.device,
                    value: tuple.value,
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::collector::procfs::ProcNetDev;
    use crate::sink::MemorySink;
    use std::collections::HashSet;

    fn fixture_collector(config: &FilterConfig) -> NetDevCollector<ProcNetDev<MockFs>> {
        NetDevCollector::new(config, ProcNetDev::new(MockFs::net_dev_fixture(), "/proc")).unwrap()
    }

    #[test]
    fn test_conflicting_filters_rejected() {
        let config = FilterConfig {
            ignore: Some("^veth".into()),
            accept: Some("^eth".into()),
        };
        let result = NetDevCollector::new(&config, ProcNetDev::new(MockFs::new(), "/proc"));
        assert!(matches!(result, Err(CollectError::Config(_))));
    }

    #[test]
    fn test_update_fixture() {
        let collector = fixture_collector(&FilterConfig::ignore("^veth"));
        let mut sink = MemorySink::new();
        collector.update(&mut sink).unwrap();

        assert_eq!(sink.samples().len(), 144);
        assert_eq!(
            sink.value("node_network_receive_bytes_total", "eth0"),
            Some(68210035552.0)
        );
        assert_eq!(
            sink.value("node_network_receive_bytes_total", "wlan0"),
            Some(10437182923.0)
        );
        assert_eq!(
            sink.value("node_network_transmit_packets_total", "tun0"),
            Some(934.0)
        );
        assert_eq!(
            sink.value("node_network_receive_fifo_total", "ibr10:30"),
            Some(0.0)
        );
        assert_eq!(
            sink.value("node_network_receive_multicast_total", "💩0"),
            Some(72.0)
        );
        assert_eq!(
            sink.value("node_network_transmit_bytes_total", "veth4B09XN"),
            None
        );

        let keys: HashSet<(String, String)> = sink
            .samples()
            .iter()
            .map(|s| (s.device.clone(), s.desc.fq_name.clone()))
            .collect();
        assert_eq!(keys.len(), 144);
    }

    #[test]
    fn test_one_descriptor_per_counter() {
        let collector = fixture_collector(&FilterConfig::default());
        let mut sink = MemorySink::new();
        collector.update(&mut sink).unwrap();
        collector.update(&mut sink).unwrap();

        assert_eq!(collector.descriptors().len(), 16);
        assert_eq!(sink.samples().len(), 2 * 11 * 16);

        let eth0 = sink
            .samples()
            .iter()
            .find(|s| s.device == "eth0" && s.desc.fq_name.ends_with("receive_bytes_total"))
            .unwrap();
        let lo = sink
            .samples()
            .iter()
            .find(|s| s.device == "lo" && s.desc.fq_name.ends_with("receive_bytes_total"))
            .unwrap();
        assert!(std::sync::Arc::ptr_eq(&eth0.desc, &lo.desc));
    }

    #[test]
    fn test_overlapping_cycles_share_collector() {
        let collector = fixture_collector(&FilterConfig::accept("^(eth|wlan)"));
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        let mut sink = MemorySink::new();
                        collector.update(&mut sink).unwrap();
                        sink.samples().len()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 2 * 16);
            }
        });
        assert_eq!(collector.descriptors().len(), 16);
    }

    #[test]
    fn test_source_error_surfaces() {
        let collector =
            NetDevCollector::new(&FilterConfig::default(), ProcNetDev::new(MockFs::new(), "/proc"))
                .unwrap();
        let mut sink = MemorySink::new();
        let err = collector.update(&mut sink).unwrap_err();
        assert!(matches!(err, CollectError::SourceUnavailable(_)));
        assert!(sink.samples().is_empty());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_platform_source_reads_proc_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("net")).unwrap();
        std::fs::write(
            dir.path().join("net/dev"),
            "h1\nh2\n  eth0: 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16\n",
        )
        .unwrap();

        let source = platform_source(dir.path().to_str().unwrap());
        let collector = NetDevCollector::new(&FilterConfig::default(), source).unwrap();
        let mut sink = MemorySink::new();
        collector.update(&mut sink).unwrap();
        assert_eq!(sink.samples().len(), 16);
    }
}
