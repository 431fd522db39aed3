//! Tests for the account recovery manager
