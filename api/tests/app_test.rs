//! Envelope behavior shared by every route: health, unknown paths,
//! unparseable input and missing credentials.

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::Value;

use sh_api::create_app;

use common::{test_context, MAX_PAYLOAD};

#[actix_web::test]
async fn test_health_check() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"]["status"], "Healthy");
}

#[actix_web::test]
async fn test_unknown_route_is_enveloped_404() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get().uri("/api/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 404);
    assert!(body["data"].is_null());
}

#[actix_web::test]
async fn test_malformed_json_is_400() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 400);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[actix_web::test]
async fn test_non_numeric_path_id_is_400() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get().uri("/api/store/abc").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_protected_route_without_token_is_401() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    for uri in ["/api/user/profile", "/api/store/my-store", "/api/product/favorites"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 401);
        assert_eq!(body["message"], "Authentication required");
    }
}

#[actix_web::test]
async fn test_garbage_token_is_401() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get()
        .uri("/api/user/profile")
        .insert_header(common::bearer("not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or expired token");
}
