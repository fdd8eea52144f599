//! Tests for the database layer
