//! Tests for the throttle sweeper

#[cfg(test)]
mod sweeper_tests;
