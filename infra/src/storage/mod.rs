//! Image storage

mod local;

pub use local::{detect_extension, LocalImageStorage};
