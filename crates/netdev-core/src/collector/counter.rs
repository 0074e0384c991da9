//! Canonical counter vocabulary and the tuples that carry it.

use crossbeam_channel::Sender;

use crate::collector::error::CollectError;

/// Canonical counter name, independent of the platform that reported it.
///
/// Every source emits a subset of this vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Counter {
    ReceiveBytes,
    ReceivePackets,
    ReceiveErrs,
    ReceiveDrop,
    ReceiveFifo,
    ReceiveFrame,
    ReceiveCompressed,
    ReceiveMulticast,
    TransmitBytes,
    TransmitPackets,
    TransmitErrs,
    TransmitDrop,
    TransmitFifo,
    TransmitColls,
    TransmitCarrier,
    TransmitCompressed,
    TransmitMulticast,
}

impl Counter {
    /// Column order of `/proc/net/dev`, receive group then transmit group.
    pub const PROC_NET_DEV: [Counter; 16] = [
        Counter::ReceiveBytes,
        Counter::ReceivePackets,
        Counter::ReceiveErrs,
        Counter::ReceiveDrop,
        Counter::ReceiveFifo,
        Counter::ReceiveFrame,
        Counter::ReceiveCompressed,
        Counter::ReceiveMulticast,
        Counter::TransmitBytes,
        Counter::TransmitPackets,
        Counter::TransmitErrs,
        Counter::TransmitDrop,
        Counter::TransmitFifo,
        Counter::TransmitColls,
        Counter::TransmitCarrier,
        Counter::TransmitCompressed,
    ];

    /// Returns the canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Counter::ReceiveBytes => "receive_bytes",
            Counter::ReceivePackets => "receive_packets",
            Counter::ReceiveErrs => "receive_errs",
            Counter::ReceiveDrop => "receive_drop",
            Counter::ReceiveFifo => "receive_fifo",
            Counter::ReceiveFrame => "receive_frame",
            Counter::ReceiveCompressed => "receive_compressed",
            Counter::ReceiveMulticast => "receive_multicast",
            Counter::TransmitBytes => "transmit_bytes",
            Counter::TransmitPackets => "transmit_packets",
            Counter::TransmitErrs => "transmit_errs",
            Counter::TransmitDrop => "transmit_drop",
            Counter::TransmitFifo => "transmit_fifo",
            Counter::TransmitColls => "transmit_colls",
            Counter::TransmitCarrier => "transmit_carrier",
            Counter::TransmitCompressed => "transmit_compressed",
            Counter::TransmitMulticast => "transmit_multicast",
        }
    }
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed counter value for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterTuple {
    /// Device name exactly as the OS reported it.
    pub device: String,
    pub counter: Counter,
    pub value: f64,
}

/// Producer side of the counter stream.
///
/// Sources call [`CounterStats::add`] for every counter of every accepted
/// device; the pipeline owns the receiving end.
pub struct CounterStats {
    tx: Sender<CounterTuple>,
}

impl CounterStats {
    pub(crate) fn new(tx: Sender<CounterTuple>) -> Self {
        Self { tx }
    }

    /// Enqueues one counter, blocking while the queue is full.
    ///
    /// Fails with [`CollectError::SinkClosed`] if the consumer is gone.
    pub fn add(&self, device: &str, counter: Counter, value: u64) -> Result<(), CollectError> {
        self.tx
            .send(CounterTuple {
                device: device.to_string(),
                counter,
                value: value as f64,
            })
            .map_err(|_| CollectError::SinkClosed)
    }
}
