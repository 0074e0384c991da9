//! Mock filesystem for testing on hosts without Linux `/proc`.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
