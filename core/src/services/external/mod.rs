//! Interfaces to external collaborators: password hashing, image storage,
//! geocoding and email delivery.
//!
//! Implementations live in the infrastructure crate; in-memory versions are
//! available for tests behind the `mocks` feature.

mod traits;

#[cfg(any(test, feature = "mocks"))]
pub mod mock;

pub use traits::{EmailSender, Geocoder, ImageStorage, PasswordHasher, PasswordVerification};

#[cfg(any(test, feature = "mocks"))]
pub use mock::{MockEmailSender, MockGeocoder, MockImageStorage, MockPasswordHasher, SentEmail};
