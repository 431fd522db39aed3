//! Periodic removal of stale throttling records.

mod sweeper;

pub use sweeper::{Sweep, SweepResult, SweeperConfig, ThrottleSweeper};

#[cfg(test)]
mod tests;
