//! Tests for the login guard
