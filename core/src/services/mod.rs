//! Business services containing domain logic and use cases.
//!
//! Services are plain structs holding `Arc<dyn Trait>` collaborators and
//! take a [`RequestContext`](crate::domain::value_objects::RequestContext)
//! on every call.

pub mod auth;
pub mod external;
pub mod product;
pub mod store;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use external::{EmailSender, Geocoder, ImageStorage, PasswordHasher, PasswordVerification};
pub use product::ProductService;
pub use store::{GeoQuery, StoreService};
pub use token::{TokenService, TokenServiceConfig};
pub use user::UserService;

#[cfg(any(test, feature = "mocks"))]
pub use external::{MockEmailSender, MockGeocoder, MockImageStorage, MockPasswordHasher, SentEmail};
