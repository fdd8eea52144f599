//! Domain entities representing core business objects.

pub mod engagement;
pub mod product;
pub mod store;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use engagement::{ProductRating, ProductView, RatingWithAuthor, UserFavorite, MAX_RATING, MIN_RATING};
pub use product::{Product, ProductImage, ProductPrice};
pub use store::{Store, StoreType};
pub use token::{hash_token, Claims, ExpiringToken, TokenPair};
pub use user::{AccountType, SignInMethod, User, UserRole};
