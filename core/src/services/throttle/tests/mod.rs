//! Tests for attempt throttling

#[cfg(test)]
mod login_tests;
#[cfg(test)]
mod store_tests;
