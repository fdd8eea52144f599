//! Store service module
//!
//! Store CRUD with ownership checks, best-effort geocoding and logo upload,
//! and Haversine proximity search.

mod service;

#[cfg(test)]
mod tests;

pub use service::{GeoQuery, StoreService};
