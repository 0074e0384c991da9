//! Metric descriptors and their process-wide cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serializer;

use crate::collector::Counter;

pub const NAMESPACE: &str = "node";
pub const SUBSYSTEM: &str = "network";

/// Identity and help text of one counter metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    pub fq_name: String,
    pub help: String,
    pub variable_labels: Vec<&'static str>,
}

impl MetricDesc {
    /// Builds the descriptor for `counter`, e.g. `node_network_receive_bytes_total`.
    pub fn for_counter(counter: Counter) -> Self {
        Self {
            fq_name: format!("{}_{}_{}_total", NAMESPACE, SUBSYSTEM, counter),
            help: format!("Network device statistic {}.", counter),
            variable_labels: vec!["device"],
        }
    }
}

pub(super) fn serialize_fq_name<S: Serializer>(
    desc: &Arc<MetricDesc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&desc.fq_name)
}

/// Lazily built descriptors, one per counter.
///
/// Safe to share between overlapping collection cycles.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descs: Mutex<HashMap<Counter, Arc<MetricDesc>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor for `counter`, creating it on first use.
    pub fn get(&self, counter: Counter) -> Arc<MetricDesc> {
        let mut descs = self
            .descs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        descs
            .entry(counter)
            .or_insert_with(|| Arc::new(MetricDesc::for_counter(counter)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.descs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_descriptor_names() {
        let desc = MetricDesc::for_counter(Counter::ReceiveBytes);
        assert_eq!(desc.fq_name, "node_network_receive_bytes_total");
        assert_eq!(desc.help, "Network device statistic receive_bytes.");
        assert_eq!(desc.variable_labels, vec!["device"]);

        let desc = MetricDesc::for_counter(Counter::TransmitColls);
        assert_eq!(desc.fq_name, "node_network_transmit_colls_total");
    }

    #[test]
    fn test_cache_reuses_descriptor() {
        let cache = DescriptorCache::new();
        assert!(cache.is_empty());

        let a = cache.get(Counter::ReceiveBytes);
        let b = cache.get(Counter::ReceiveBytes);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        cache.get(Counter::TransmitBytes);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_concurrent_insert() {
        let cache = DescriptorCache::new();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for counter in Counter::PROC_NET_DEV {
                        let desc = cache.get(counter);
                        assert_eq!(desc.fq_name, MetricDesc::for_counter(counter).fq_name);
                    }
                });
            }
        });
        assert_eq!(cache.len(), 16);
    }
}
