//! Sink writing one JSON object per sample.

use std::io::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

use super::{MetricSink, Sample};

#[derive(Serialize)]
struct Line<'a> {
    name: &'a str,
    device: &'a str,
    value: f64,
    timestamp: String,
}

/// Writes samples as JSON lines, stamped with the current cycle's time.
///
/// Write failures are logged and the sample dropped; the pipeline keeps
/// draining.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    timestamp: DateTime<Utc>,
    written: u64,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            timestamp: Utc::now(),
            written: 0,
        }
    }

    /// Sets the timestamp attached to subsequent samples.
    pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.timestamp = timestamp;
    }

    /// Number of samples successfully written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_sample(&mut self, sample: &Sample) -> io::Result<()> {
        let line = Line {
            name: &sample.desc.fq_name,
            device: &sample.device,
            value: sample.value,
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        // One write per line so a failed sample leaves no partial record.
        let mut buf = serde_json::to_vec(&line)?;
        buf.push(b'\n');
        self.writer.write_all(&buf)
    }
}

impl<W: Write + Send> MetricSink for JsonLinesSink<W> {
    fn emit(&mut self, sample: Sample) {
        match self.write_sample(&sample) {
            Ok(()) => self.written += 1,
            Err(e) => warn!(
                "dropping sample {}{{device={:?}}}: {}",
                sample.desc.fq_name, sample.device, e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Counter;
    use crate::sink::MetricDesc;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn sample(device: &str, value: f64) -> Sample {
        Sample {
            desc: Arc::new(MetricDesc::for_counter(Counter::ReceiveMulticast)),
            device: device.to_string(),
            value,
        }
    }

    #[test]
    fn test_writes_json_lines() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.set_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        sink.emit(sample("💩0", 72.0));
        sink.emit(sample("ibr10:30", 0.0));
        assert_eq!(sink.written(), 2);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "node_network_receive_multicast_total");
        assert_eq!(first["device"], "💩0");
        assert_eq!(first["value"], 72.0);
        assert_eq!(first["timestamp"], "2024-05-01T12:00:00.000Z");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["device"], "ibr10:30");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_dropped() {
        let mut sink = JsonLinesSink::new(FailingWriter);
        sink.emit(sample("eth0", 1.0));
        assert_eq!(sink.written(), 0);
    }

    /// Accepts every write except the `fail_at`-th call.
    struct FlakyWriter {
        out: Vec<u8>,
        calls: usize,
        fail_at: usize,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == self.fail_at {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_sample_leaves_no_partial_line() {
        let mut sink = JsonLinesSink::new(FlakyWriter {
            out: Vec::new(),
            calls: 0,
            fail_at: 2,
        });
        sink.emit(sample("eth0", 1.0));
        sink.emit(sample("eth1", 2.0));
        sink.emit(sample("eth2", 3.0));
        assert_eq!(sink.written(), 2);

        let out = String::from_utf8(sink.into_inner().out).unwrap();
        let devices: Vec<String> = out
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["device"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(devices, vec!["eth0", "eth2"]);
    }

    #[test]
    fn test_sample_serializes_name() {
        let json = serde_json::to_value(sample("eth0", 5.0)).unwrap();
        assert_eq!(json["name"], "node_network_receive_multicast_total");
        assert_eq!(json["device"], "eth0");
        assert_eq!(json["value"], 5.0);
    }
}
