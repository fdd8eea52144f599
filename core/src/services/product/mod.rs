//! Product service module
//!
//! Product CRUD with append-only price history and best-effort image upload,
//! plus favorites, view history, ratings and the listing endpoints built on
//! them (recommendations, on-sale).

mod service;

#[cfg(test)]
mod tests;

pub use service::{
    ProductService, MAX_PRODUCT_IMAGES, ON_SALE_LIMIT, RECOMMENDATION_LIMIT, VIEW_HISTORY_LIMIT,
};
