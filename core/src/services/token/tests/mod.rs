//! Tests for token service

#[cfg(test)]
mod service_tests;
