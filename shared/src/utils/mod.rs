//! Utility modules

pub mod validation;
