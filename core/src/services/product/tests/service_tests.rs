//! Unit tests for product service

use std::sync::Arc;

use rust_decimal::Decimal;
use sh_shared::types::Patch;

use crate::domain::entities::store::Store;
use crate::domain::entities::user::{User, UserRole};
use crate::domain::value_objects::commands::{NewProduct, NewRating, ProductSearch, ProductUpdate};
use crate::domain::value_objects::request_context::{Principal, RequestContext};
use crate::errors::{DomainError, ProductError};
use crate::repositories::{MockDatabase, StoreRepository, UserRepository};
use crate::services::external::MockImageStorage;
use crate::services::product::{ProductService, VIEW_HISTORY_LIMIT};

struct Harness {
    db: MockDatabase,
    storage: MockImageStorage,
    service: ProductService,
}

fn harness() -> Harness {
    let db = MockDatabase::new();
    let storage = MockImageStorage::new();
    let service = ProductService::new(
        Arc::new(db.products()),
        Arc::new(db.stores()),
        Arc::new(db.ratings()),
        Arc::new(db.activity()),
        Arc::new(storage.clone()),
    );
    Harness {
        db,
        storage,
        service,
    }
}

async fn seed_user(db: &MockDatabase, email: &str) -> RequestContext {
    let user = db
        .users()
        .create(User::new("Shopper", email, None, "hash".to_string()))
        .await
        .unwrap();
    RequestContext::authenticated(
        "test-request",
        Principal {
            user_id: user.id,
            email: user.email,
            role: UserRole::Customer,
        },
    )
}

async fn seed_seller(db: &MockDatabase, email: &str) -> (RequestContext, Store) {
    let ctx = seed_user(db, email).await;
    let store = db
        .stores()
        .create_for_owner(Store::new(ctx.user_id().unwrap(), "Tech Hub", "Electronics"))
        .await
        .unwrap();
    (ctx, store)
}

fn new_product(name: &str, price: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        category: "Phones".to_string(),
        price: Decimal::new(price, 0),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_product_requires_store() {
    let h = harness();
    let ctx = seed_user(&h.db, "buyer@example.com").await;

    let err = h
        .service
        .create_product(&ctx, new_product("Phone", 100))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Product(ProductError::StoreRequired)));
    assert_eq!(err.client_message(), "You must have a store to create products");
}

#[tokio::test]
async fn test_create_product_with_images_and_price_history() {
    let h = harness();
    let (ctx, store) = seed_seller(&h.db, "seller@example.com").await;

    let response = h
        .service
        .create_product(
            &ctx,
            NewProduct {
                sale_percent: 25,
                images: vec!["aGVsbG8=".to_string(), "d29ybGQ=".to_string()],
                ..new_product("Phone", 100)
            },
        )
        .await
        .unwrap();

    assert_eq!(response.code, 201);
    assert_eq!(response.message, "Product created successfully");
    let details = response.data.unwrap();
    assert_eq!(details.store_name, "Tech Hub");
    assert_eq!(details.images.len(), 2);
    assert_eq!(details.images[0].display_order, 0);
    assert_eq!(details.product.final_price(), Decimal::new(7500, 2));

    let names = h.storage.uploaded_names().await;
    assert!(names
        .iter()
        .all(|n| n.starts_with(&format!("products/{}/", store.id))));

    let history = h
        .service
        .get_price_history(&ctx, details.product.id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].price, Decimal::new(100, 0));
}

#[tokio::test]
async fn test_create_product_validates_input() {
    let h = harness();
    let (ctx, _) = seed_seller(&h.db, "seller@example.com").await;

    let zero_price = h
        .service
        .create_product(&ctx, new_product("Phone", 0))
        .await
        .unwrap_err();
    let bad_sale = h
        .service
        .create_product(
            &ctx,
            NewProduct {
                sale_percent: 150,
                ..new_product("Phone", 10)
            },
        )
        .await
        .unwrap_err();
    let no_name = h
        .service
        .create_product(&ctx, new_product("  ", 10))
        .await
        .unwrap_err();

    assert_eq!(zero_price.status_code(), 400);
    assert_eq!(bad_sale.status_code(), 400);
    assert_eq!(no_name.status_code(), 400);
}

#[tokio::test]
async fn test_failed_image_upload_still_creates_product() {
    let h = harness();
    let (ctx, _) = seed_seller(&h.db, "seller@example.com").await;
    h.storage.set_failing(true);

    let details = h
        .service
        .create_product(
            &ctx,
            NewProduct {
                images: vec!["aGVsbG8=".to_string()],
                ..new_product("Phone", 100)
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();

    assert!(details.images.is_empty());
    assert!(details.main_image().is_none());
}

#[tokio::test]
async fn test_price_change_appends_history_and_images() {
    let h = harness();
    let (ctx, _) = seed_seller(&h.db, "seller@example.com").await;
    let created = h
        .service
        .create_product(
            &ctx,
            NewProduct {
                images: vec!["aGVsbG8=".to_string()],
                ..new_product("Phone", 100)
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    let id = created.product.id;

    let same_price = h
        .service
        .update_product(
            &ctx,
            id,
            ProductUpdate {
                price: Patch::Present(Decimal::new(100, 0)),
                description: Patch::Present("Unlocked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same_price.message, "Product updated successfully");

    let updated = h
        .service
        .update_product(
            &ctx,
            id,
            ProductUpdate {
                price: Patch::Present(Decimal::new(80, 0)),
                name: Patch::Present("   ".to_string()),
                new_images: vec!["d29ybGQ=".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(updated.product.name, "Phone");
    assert_eq!(updated.product.description.as_deref(), Some("Unlocked"));
    assert_eq!(updated.images.len(), 2);
    assert_eq!(updated.images[1].display_order, 1);

    let history = h
        .service
        .get_price_history(&ctx, id)
        .await
        .unwrap()
        .data
        .unwrap();
    let prices: Vec<Decimal> = history.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![Decimal::new(100, 0), Decimal::new(80, 0)]);
}

#[tokio::test]
async fn test_update_and_delete_require_owning_store() {
    let h = harness();
    let (owner, _) = seed_seller(&h.db, "owner@example.com").await;
    let (other_seller, _) = seed_seller(&h.db, "other@example.com").await;
    let buyer = seed_user(&h.db, "buyer@example.com").await;
    let id = h
        .service
        .create_product(&owner, new_product("Phone", 100))
        .await
        .unwrap()
        .data
        .unwrap()
        .product
        .id;

    let update = h
        .service
        .update_product(&other_seller, id, ProductUpdate::default())
        .await
        .unwrap_err();
    let delete = h.service.delete_product(&buyer, id).await.unwrap_err();
    let missing = h
        .service
        .delete_product(&owner, 9999)
        .await
        .unwrap_err();

    assert_eq!(update.client_message(), "You are not authorized to update this product");
    assert_eq!(delete.client_message(), "You are not authorized to delete this product");
    assert_eq!(missing.status_code(), 404);

    let deleted = h.service.delete_product(&owner, id).await.unwrap();
    assert_eq!(deleted.message, "Product deleted successfully");
    let gone = h
        .service
        .get_product(&RequestContext::anonymous("r"), id)
        .await
        .unwrap_err();
    assert_eq!(gone.client_message(), "Product not found");
}

#[tokio::test]
async fn test_favorites_are_idempotent() {
    let h = harness();
    let (seller, _) = seed_seller(&h.db, "seller@example.com").await;
    let buyer = seed_user(&h.db, "buyer@example.com").await;
    let id = h
        .service
        .create_product(&seller, new_product("Phone", 100))
        .await
        .unwrap()
        .data
        .unwrap()
        .product
        .id;

    let first = h.service.add_to_favorites(&buyer, id).await.unwrap();
    let second = h.service.add_to_favorites(&buyer, id).await.unwrap();
    assert_eq!(first.message, "Product added to favorites");
    assert_eq!(second.message, "Product is already in favorites");

    let favorites = h
        .service
        .get_favorite_products(&buyer)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(favorites.len(), 1);
    assert!(favorites[0].is_favorite);

    let removed = h.service.remove_from_favorites(&buyer, id).await.unwrap();
    let again = h.service.remove_from_favorites(&buyer, id).await.unwrap();
    assert_eq!(removed.message, "Product removed from favorites");
    assert_eq!(again.message, "Product is not in favorites");

    let missing = h.service.add_to_favorites(&buyer, 9999).await.unwrap_err();
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn test_get_product_records_view_for_authenticated_caller() {
    let h = harness();
    let (seller, _) = seed_seller(&h.db, "seller@example.com").await;
    let buyer = seed_user(&h.db, "buyer@example.com").await;
    let id = h
        .service
        .create_product(&seller, new_product("Phone", 100))
        .await
        .unwrap()
        .data
        .unwrap()
        .product
        .id;
    h.service.add_to_favorites(&buyer, id).await.unwrap();

    let anonymous = h
        .service
        .get_product(&RequestContext::anonymous("r"), id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert!(!anonymous.is_favorite);
    assert_eq!(h.db.view_count().await, 0);

    let seen = h
        .service
        .get_product(&buyer, id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert!(seen.is_favorite);
    assert_eq!(h.db.view_count().await, 1);
}

#[tokio::test]
async fn test_view_failure_is_not_an_error() {
    let h = harness();
    let (seller, _) = seed_seller(&h.db, "seller@example.com").await;
    let id = h
        .service
        .create_product(&seller, new_product("Phone", 100))
        .await
        .unwrap()
        .data
        .unwrap()
        .product
        .id;
    h.db.fail_view_writes(true).await;

    let response = h.service.add_product_view(&seller, id).await.unwrap();
    assert_eq!(response.code, 200);
    assert_eq!(response.message, "Product view not recorded, but continuing");

    assert!(h.service.get_product(&seller, id).await.is_ok());
    assert_eq!(h.db.view_count().await, 0);
}

#[tokio::test]
async fn test_view_history_is_distinct_recent_first_and_capped() {
    let h = harness();
    let (seller, _) = seed_seller(&h.db, "seller@example.com").await;
    let buyer = seed_user(&h.db, "buyer@example.com").await;
    let buyer_id = buyer.user_id().unwrap();

    let mut ids = Vec::new();
    for i in 0..(VIEW_HISTORY_LIMIT as i64 + 5) {
        let id = h
            .service
            .create_product(&seller, new_product(&format!("Item {i}"), 10 + i))
            .await
            .unwrap()
            .data
            .unwrap()
            .product
            .id;
        ids.push(id);
    }

    // Older views first; the first product is viewed again most recently
    for (age, id) in ids.iter().rev().enumerate() {
        h.db.seed_view(buyer_id, *id, 1000 + age as i64).await;
    }
    h.db.seed_view(buyer_id, ids[0], 1).await;
    h.db.seed_view(buyer_id, ids[0], 2).await;

    let history = h
        .service
        .get_view_history(&buyer)
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(history.len(), VIEW_HISTORY_LIMIT);
    assert_eq!(history[0].product.id, ids[0]);
    // After the re-viewed product, the most recent of the rest follows
    assert_eq!(history[1].product.id, ids[ids.len() - 1]);
    let distinct: std::collections::HashSet<i64> =
        history.iter().map(|d| d.product.id).collect();
    assert_eq!(distinct.len(), history.len());
}

#[tokio::test]
async fn test_rating_upsert_keeps_one_row_per_user() {
    let h = harness();
    let (seller, _) = seed_seller(&h.db, "seller@example.com").await;
    let buyer = seed_user(&h.db, "buyer@example.com").await;
    let id = h
        .service
        .create_product(&seller, new_product("Phone", 100))
        .await
        .unwrap()
        .data
        .unwrap()
        .product
        .id;

    let first = h
        .service
        .rate_product(
            &buyer,
            id,
            NewRating {
                rating: 3,
                comment: Some("Fine".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.message, "Product rating added successfully");

    h.service
        .rate_product(
            &buyer,
            id,
            NewRating {
                rating: 5,
                comment: None,
            },
        )
        .await
        .unwrap();
    h.service
        .rate_product(
            &seller,
            id,
            NewRating {
                rating: 4,
                comment: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(h.db.rating_count().await, 2);
    let ratings = h
        .service
        .get_product_ratings(&buyer, id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(ratings.len(), 2);
    assert!(ratings.iter().all(|r| r.user_name == "Shopper"));

    let details = h.service.get_product(&buyer, id).await.unwrap().data.unwrap();
    assert_eq!(details.rating.count, 2);
    assert!((details.rating.average - 4.5).abs() < f64::EPSILON);

    let invalid = h
        .service
        .rate_product(
            &buyer,
            id,
            NewRating {
                rating: 6,
                comment: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(invalid.client_message(), "Rating must be between 1 and 5");
    assert_eq!(invalid.status_code(), 400);
}

#[tokio::test]
async fn test_recommendations_fall_back_to_recent_products() {
    let h = harness();
    let (seller, _) = seed_seller(&h.db, "seller@example.com").await;
    let buyer = seed_user(&h.db, "buyer@example.com").await;
    let mut ids = Vec::new();
    for i in 0..3 {
        let id = h
            .service
            .create_product(&seller, new_product(&format!("Item {i}"), 10))
            .await
            .unwrap()
            .data
            .unwrap()
            .product
            .id;
        ids.push(id);
    }

    let recent = h
        .service
        .get_recommended_products(&buyer)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].product.id, ids[2]);

    h.service.add_to_favorites(&buyer, ids[1]).await.unwrap();
    let favorites = h
        .service
        .get_recommended_products(&buyer)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].product.id, ids[1]);
}

#[tokio::test]
async fn test_search_and_on_sale_listing() {
    let h = harness();
    let (seller, store) = seed_seller(&h.db, "seller@example.com").await;
    h.service
        .create_product(&seller, new_product("Galaxy Phone", 300))
        .await
        .unwrap();
    h.service
        .create_product(&seller, new_product("Laptop Sleeve", 20))
        .await
        .unwrap();

    let anonymous = RequestContext::anonymous("r");
    let phones = h
        .service
        .search_products(
            &anonymous,
            ProductSearch {
                query: Some("  galaxy ".to_string()),
                store_id: Some(store.id),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0].product.name, "Galaxy Phone");

    let cheap = h
        .service
        .search_products(
            &anonymous,
            ProductSearch {
                max_price: Some(Decimal::new(50, 0)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(cheap.len(), 1);

    // No sale percentages set, yet both are listed
    let on_sale = h
        .service
        .get_on_sale_products(&anonymous)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(on_sale.len(), 2);

    let by_store = h
        .service
        .get_products_by_store(&anonymous, store.id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(by_store.len(), 2);
}
