//! Store and product routes end to end against the in-memory repositories

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use sh_api::create_app;

use common::{
    access_token, bearer, create_product_body, create_store_body, register_request,
    test_context, MAX_PAYLOAD,
};

#[actix_web::test]
async fn test_create_store_and_fetch_my_store() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;
    let session: Value =
        test::call_and_read_body_json(&app, register_request("Owner", "owner@example.com").to_request()).await;
    let token = access_token(&session);

    let req = test::TestRequest::post()
        .uri("/api/store")
        .insert_header(bearer(&token))
        .set_json(create_store_body("Gadget Hub"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["data"]["name"], "Gadget Hub");
    assert_eq!(created["data"]["type"], "local");
    assert!(created["data"]["logoUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://cdn.test/"));

    let req = test::TestRequest::get()
        .uri("/api/store/my-store")
        .insert_header(bearer(&token))
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["data"]["store"]["id"], created["data"]["id"]);
    assert_eq!(page["data"]["productsLength"], 0);

    let req = test::TestRequest::get()
        .uri("/api/user/profile")
        .insert_header(bearer(&token))
        .to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["data"]["hasStore"], true);
    assert_eq!(profile["data"]["storeId"], created["data"]["id"]);
}

#[actix_web::test]
async fn test_second_store_is_rejected() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;
    let session: Value =
        test::call_and_read_body_json(&app, register_request("Owner", "owner@example.com").to_request()).await;
    let token = access_token(&session);

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri("/api/store")
            .insert_header(bearer(&token))
            .set_json(create_store_body("Gadget Hub"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn test_store_without_address_is_400() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;
    let session: Value =
        test::call_and_read_body_json(&app, register_request("Owner", "owner@example.com").to_request()).await;

    let req = test::TestRequest::post()
        .uri("/api/store")
        .insert_header(bearer(&access_token(&session)))
        .set_json(json!({"name": "No Address", "category": "Food"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_missing_store_is_404() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get().uri("/api/store/9999").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 404);
}

#[actix_web::test]
async fn test_product_requires_a_store() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;
    let session: Value =
        test::call_and_read_body_json(&app, register_request("Buyer", "buyer@example.com").to_request()).await;

    let req = test::TestRequest::post()
        .uri("/api/product")
        .insert_header(bearer(&access_token(&session)))
        .set_json(create_product_body("Phone", "100.00"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_product_validation_rejects_bad_price() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;
    let session: Value =
        test::call_and_read_body_json(&app, register_request("Owner", "owner@example.com").to_request()).await;

    let req = test::TestRequest::post()
        .uri("/api/product")
        .insert_header(bearer(&access_token(&session)))
        .set_json(create_product_body("Phone", "-5"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["price"].is_array());
}

#[actix_web::test]
async fn test_product_lifecycle_with_favorites_and_history() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;

    let owner: Value =
        test::call_and_read_body_json(&app, register_request("Owner", "owner@example.com").to_request()).await;
    let owner_token = access_token(&owner);
    let req = test::TestRequest::post()
        .uri("/api/store")
        .insert_header(bearer(&owner_token))
        .set_json(create_store_body("Gadget Hub"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/product")
        .insert_header(bearer(&owner_token))
        .set_json(create_product_body("Phone", "100.00"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = test::read_body_json(resp).await;
    let product_id = product["data"]["id"].as_i64().unwrap();
    assert_eq!(product["data"]["images"].as_array().unwrap().len(), 2);
    assert_eq!(product["data"]["images"][0]["isMainImage"], true);
    assert_eq!(product["data"]["storeName"], "Gadget Hub");

    // Anonymous detail view
    let req = test::TestRequest::get()
        .uri(&format!("/api/product/{}", product_id))
        .to_request();
    let anonymous: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(anonymous["data"]["isFavorite"], false);
    assert_eq!(ctx.db.view_count().await, 0);

    let buyer: Value =
        test::call_and_read_body_json(&app, register_request("Buyer", "buyer@example.com").to_request()).await;
    let buyer_token = access_token(&buyer);

    let mut messages = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/product/{}/favorite", product_id))
            .insert_header(bearer(&buyer_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        messages.push(body["message"].as_str().unwrap().to_string());
    }
    assert_eq!(
        messages,
        vec!["Product added to favorites", "Product is already in favorites"]
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/product/{}", product_id))
        .insert_header(bearer(&buyer_token))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["data"]["isFavorite"], true);
    assert_eq!(ctx.db.view_count().await, 1);

    let req = test::TestRequest::get()
        .uri("/api/product/favorites")
        .insert_header(bearer(&buyer_token))
        .to_request();
    let favorites: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(favorites["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/product/history")
        .insert_header(bearer(&buyer_token))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history["data"][0]["id"], product_id);
}

#[actix_web::test]
async fn test_price_change_extends_history() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;
    let owner: Value =
        test::call_and_read_body_json(&app, register_request("Owner", "owner@example.com").to_request()).await;
    let token = access_token(&owner);
    let req = test::TestRequest::post()
        .uri("/api/store")
        .insert_header(bearer(&token))
        .set_json(create_store_body("Gadget Hub"))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/product")
        .insert_header(bearer(&token))
        .set_json(create_product_body("Phone", "100.00"))
        .to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;
    let product_id = product["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/product/{}", product_id))
        .insert_header(bearer(&token))
        .set_json(json!({"price": "80.00"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/product/{}/price-history", product_id))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    let entries = history["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["isCurrentPrice"], true);
    assert_eq!(entries[0]["isCurrentPrice"], false);
}

#[actix_web::test]
async fn test_other_users_cannot_delete_product() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;
    let owner: Value =
        test::call_and_read_body_json(&app, register_request("Owner", "owner@example.com").to_request()).await;
    let owner_token = access_token(&owner);
    let req = test::TestRequest::post()
        .uri("/api/store")
        .insert_header(bearer(&owner_token))
        .set_json(create_store_body("Gadget Hub"))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/product")
        .insert_header(bearer(&owner_token))
        .set_json(create_product_body("Phone", "100.00"))
        .to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;
    let product_id = product["data"]["id"].as_i64().unwrap();

    let intruder: Value =
        test::call_and_read_body_json(&app, register_request("Intruder", "x@example.com").to_request()).await;
    let req = test::TestRequest::delete()
        .uri(&format!("/api/product/{}", product_id))
        .insert_header(bearer(&access_token(&intruder)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_client_error());
    let req = test::TestRequest::get()
        .uri(&format!("/api/product/{}", product_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_store_search_without_radius_is_text_only() {
    let ctx = test_context().await;
    let app = test::init_service(create_app(ctx.state.clone(), MAX_PAYLOAD)).await;
    let session: Value =
        test::call_and_read_body_json(&app, register_request("Owner", "owner@example.com").to_request()).await;
    let req = test::TestRequest::post()
        .uri("/api/store")
        .insert_header(bearer(&access_token(&session)))
        .set_json(create_store_body("Gadget Hub"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/store/search?query=gadget&latitude=0&longitude=0")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/store/search?query=gadget&latitude=0&longitude=0&radiusKm=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
