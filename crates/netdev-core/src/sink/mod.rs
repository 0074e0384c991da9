//! Metric sinks: turn counter tuples into labeled samples.

mod desc;
mod json;

use std::sync::Arc;

use serde::Serialize;

pub use desc::{DescriptorCache, MetricDesc, NAMESPACE, SUBSYSTEM};
pub use json::JsonLinesSink;

/// One counter sample for one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    #[serde(rename = "name", serialize_with = "desc::serialize_fq_name")]
    pub desc: Arc<MetricDesc>,
    pub device: String,
    pub value: f64,
}

/// Consumer of samples. Called from the pipeline's consumer thread.
pub trait MetricSink: Send {
    fn emit(&mut self, sample: Sample);
}

/// Sink that keeps every sample in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Vec<Sample>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Finds the value of `fq_name` for `device`.
    pub fn value(&self, fq_name: &str, device: &str) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.desc.fq_name == fq_name && s.device == device)
            .map(|s| s.value)
    }
}

impl MetricSink for MemorySink {
    fn emit(&mut self, sample: Sample) {
        self.samples.push(sample);
    }
}
