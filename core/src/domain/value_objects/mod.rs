//! Value objects representing immutable domain concepts and service inputs.

pub mod commands;
pub mod geo;
pub mod read_models;
pub mod request_context;

// Re-export commonly used types
pub use commands::{
    ChangePassword, Credentials, NewProduct, NewRating, NewStore, Page, ProductSearch,
    ProductUpdate, ProfileUpdate, RegisterUser, ResetPassword, StoreUpdate,
};
pub use geo::{haversine_km, Coordinates, DEFAULT_NEARBY_RADIUS_KM, EARTH_RADIUS_KM};
pub use read_models::{AuthSession, ProductDetails, RatingSummary, RefreshedToken, StoreDetails};
pub use request_context::{Principal, RequestContext};
