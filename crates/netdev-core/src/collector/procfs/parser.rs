//! Parser for `/proc/net/dev`.
//!
//! Pure functions over string input, so they are testable without a
//! Linux host.

use crate::collector::counter::Counter;

/// Number of leading header lines in `/proc/net/dev`.
pub const HEADER_LINES: usize = 2;

/// Number of counter columns per device line.
///
/// Fixed for this format version. Lines with any other count are rejected
/// rather than auto-detected.
pub const FIELD_COUNT: usize = 16;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// One device line of `/proc/net/dev`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetDevStats {
    /// Interface name, verbatim apart from surrounding whitespace.
    pub interface: String,
    /// Raw columns in [`Counter::PROC_NET_DEV`] order.
    pub values: [u64; FIELD_COUNT],
}

impl NetDevStats {
    /// Iterates over `(counter, value)` pairs in column order.
    pub fn counters(&self) -> impl Iterator<Item = (Counter, u64)> + '_ {
        Counter::PROC_NET_DEV
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    pub fn get(&self, counter: Counter) -> Option<u64> {
        self.counters()
            .find(|(c, _)| *c == counter)
            .map(|(_, v)| v)
    }
}

/// Returns the device lines of `/proc/net/dev` with their 1-based line numbers.
///
/// The first [`HEADER_LINES`] lines are dropped by count, whatever they
/// contain. Blank lines are skipped.
///
/// Format:
/// Inter-|   Receive                                                |  Transmit
///  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
///    lo: 1234567     1234    0    0    0     0          0         0  1234567     1234    0    0    0     0       0          0
pub fn device_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .skip(HEADER_LINES)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
}

/// Parses a single device line.
///
/// The name is split off at the last colon, since interface aliases such as
/// `ibr10:30` carry colons of their own.
pub fn parse_net_dev_line(line: &str) -> Result<NetDevStats, ParseError> {
    let (name, rest) = line
        .rsplit_once(':')
        .ok_or_else(|| ParseError::new(format!("missing ':' in line {:?}", line.trim())))?;
    let interface = name.trim().to_string();

    let fields: Vec<&str> = rest.split_whitespace().collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::new(format!(
            "device {:?}: expected {} fields, got {}",
            interface,
            FIELD_COUNT,
            fields.len()
        )));
    }

    let mut values = [0u64; FIELD_COUNT];
    for (idx, (slot, field)) in values.iter_mut().zip(&fields).enumerate() {
        *slot = field.parse().map_err(|_| {
            ParseError::new(format!(
                "device {:?}: invalid {} value {:?}",
                interface,
                Counter::PROC_NET_DEV[idx],
                field
            ))
        })?;
    }

    Ok(NetDevStats { interface, values })
}
