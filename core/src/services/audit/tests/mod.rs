//! Tests for the security event log
