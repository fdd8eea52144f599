//! Application state shared across workers

use std::sync::Arc;

use sh_core::services::{AuthService, ProductService, StoreService, TokenService, UserService};

/// Services handed to every handler through `web::Data<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub store_service: Arc<StoreService>,
    pub product_service: Arc<ProductService>,
    pub user_service: Arc<UserService>,
    /// Used by the JWT middleware to verify inbound access tokens
    pub token_service: Arc<TokenService>,
}
