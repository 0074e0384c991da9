//! Counter source for the Linux `/proc` filesystem.

pub mod netdev;
pub mod parser;

pub use netdev::ProcNetDev;
pub use parser::{NetDevStats, ParseError};
