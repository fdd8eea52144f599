//! Tests for store service

#[cfg(test)]
mod service_tests;
