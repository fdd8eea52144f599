//! Shared setup for the HTTP-level tests: an [`AppState`] backed by the
//! in-memory repositories and collaborators.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{http::header, test, web};
use serde_json::{json, Value};

use sh_api::AppState;
use sh_core::domain::value_objects::geo::Coordinates;
use sh_core::repositories::MockDatabase;
use sh_core::services::{
    AuthService, AuthServiceConfig, MockEmailSender, MockGeocoder, MockImageStorage,
    MockPasswordHasher, ProductService, StoreService, TokenService, TokenServiceConfig,
    UserService,
};
use sh_shared::config::JwtConfig;

pub const MAX_PAYLOAD: usize = 1024 * 1024;
pub const KNOWN_ADDRESS: &str = "Tahrir Square, Cairo";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub db: MockDatabase,
    pub emails: MockEmailSender,
    pub images: MockImageStorage,
}

pub async fn test_context() -> TestContext {
    let db = MockDatabase::new();
    let emails = MockEmailSender::new();
    let images = MockImageStorage::new();
    let geocoder = MockGeocoder::new()
        .with_address(KNOWN_ADDRESS, Coordinates::new(30.0444, 31.2357))
        .await;

    let jwt = JwtConfig::new("integration-test-secret-0123456789abcdef");
    let token_service = Arc::new(TokenService::new(TokenServiceConfig::from(&jwt)));

    let state = web::Data::new(AppState {
        auth_service: Arc::new(AuthService::new(
            Arc::new(db.users()),
            Arc::new(MockPasswordHasher),
            token_service.clone(),
            Arc::new(emails.clone()),
            AuthServiceConfig::default(),
        )),
        store_service: Arc::new(StoreService::new(
            Arc::new(db.stores()),
            Arc::new(db.products()),
            Arc::new(images.clone()),
            Arc::new(geocoder),
        )),
        product_service: Arc::new(ProductService::new(
            Arc::new(db.products()),
            Arc::new(db.stores()),
            Arc::new(db.ratings()),
            Arc::new(db.activity()),
            Arc::new(images.clone()),
        )),
        user_service: Arc::new(UserService::new(
            Arc::new(db.users()),
            Arc::new(images.clone()),
        )),
        token_service,
    });

    TestContext {
        state,
        db,
        emails,
        images,
    }
}

pub fn register_request(name: &str, email: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "phoneNumber": "01000000000",
            "password": "secret123",
            "confirmPassword": "secret123"
        }))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub fn access_token(body: &Value) -> String {
    body["data"]["accessToken"]
        .as_str()
        .expect("access token in login payload")
        .to_string()
}

pub fn create_store_body(name: &str) -> Value {
    json!({
        "name": name,
        "type": "local",
        "category": "Electronics",
        "address": KNOWN_ADDRESS,
        "description": "Phones and accessories",
        "phone": "0223456789",
        "logoBase64": "aGVsbG8="
    })
}

pub fn create_product_body(name: &str, price: &str) -> Value {
    json!({
        "name": name,
        "category": "Phones",
        "price": price,
        "salePercent": 10,
        "brand": "Acme",
        "images": ["aW1hZ2Ux", "aW1hZ2Uy"]
    })
}
