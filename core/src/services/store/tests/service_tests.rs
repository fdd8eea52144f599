//! Unit tests for store service

use std::sync::Arc;

use sh_shared::types::Patch;

use crate::domain::entities::user::{User, UserRole};
use crate::domain::value_objects::commands::{NewStore, Page, StoreUpdate};
use crate::domain::value_objects::geo::Coordinates;
use crate::domain::value_objects::request_context::{Principal, RequestContext};
use crate::errors::{DomainError, StoreError};
use crate::repositories::{MockDatabase, StoreRepository, UserRepository};
use crate::services::external::{MockGeocoder, MockImageStorage};
use crate::services::store::{GeoQuery, StoreService};

const CAIRO: &str = "Tahrir Square, Cairo";
const GIZA: &str = "Pyramids Rd, Giza";

struct Harness {
    db: MockDatabase,
    storage: MockImageStorage,
    service: StoreService,
}

async fn harness() -> Harness {
    let db = MockDatabase::new();
    let storage = MockImageStorage::new();
    let geocoder = MockGeocoder::new()
        .with_address(CAIRO, Coordinates::new(30.0444, 31.2357))
        .await
        .with_address(GIZA, Coordinates::new(30.0131, 31.2089))
        .await;
    let service = StoreService::new(
        Arc::new(db.stores()),
        Arc::new(db.products()),
        Arc::new(storage.clone()),
        Arc::new(geocoder),
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
        .create(User::new("Owner", email, None, "hash".to_string()))
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

fn new_store(name: &str, address: &str) -> NewStore {
    NewStore {
        name: name.to_string(),
        category: "Electronics".to_string(),
        address: Some(address.to_string()),
        description: Some("Phones and laptops".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_store_links_owner_and_geocodes() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;

    let response = h
        .service
        .create_store(&ctx, new_store("Tech Hub", CAIRO))
        .await
        .unwrap();

    assert_eq!(response.code, 201);
    assert_eq!(response.message, "Store created successfully");
    let store = response.data.unwrap();
    let coords = store.coordinates().unwrap();
    assert!((coords.latitude - 30.0444).abs() < 1e-6);

    let owner = h
        .db
        .users()
        .find_by_id(ctx.user_id().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owner.store_id, Some(store.id));
    assert!(owner.has_store());
}

#[tokio::test]
async fn test_second_store_fails() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;
    h.service
        .create_store(&ctx, new_store("First", CAIRO))
        .await
        .unwrap();

    let err = h
        .service
        .create_store(&ctx, new_store("Second", GIZA))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Store(StoreError::AlreadyHasStore)));
    assert_eq!(err.client_message(), "User already has a store");
}

#[tokio::test]
async fn test_create_store_requires_name_and_address() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;

    let blank_name = h
        .service
        .create_store(&ctx, new_store("   ", CAIRO))
        .await
        .unwrap_err();
    let no_address = h
        .service
        .create_store(
            &ctx,
            NewStore {
                address: None,
                ..new_store("Shop", CAIRO)
            },
        )
        .await
        .unwrap_err();

    assert_eq!(blank_name.client_message(), "Name and Address are required");
    assert_eq!(no_address.client_message(), "Name and Address are required");
}

#[tokio::test]
async fn test_geocode_failure_stores_origin() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;

    let store = h
        .service
        .create_store(&ctx, new_store("Nowhere", "Unknown street 1"))
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(store.coordinates(), Some(Coordinates::origin()));
}

#[tokio::test]
async fn test_logo_upload_is_best_effort() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;
    let user_id = ctx.user_id().unwrap();

    h.storage.set_failing(true);
    let store = h
        .service
        .create_store(
            &ctx,
            NewStore {
                logo: Some("aGVsbG8=".to_string()),
                ..new_store("Shop", CAIRO)
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    assert!(store.logo_url.is_none());

    h.storage.set_failing(false);
    let updated = h
        .service
        .update_store(
            &ctx,
            store.id,
            StoreUpdate {
                logo: Patch::Present("aGVsbG8=".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();

    let names = h.storage.uploaded_names().await;
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with(&format!("stores/{user_id}/main-")));
    assert!(updated.logo_url.is_some());
}

#[tokio::test]
async fn test_sparse_update_leaves_other_fields_intact() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;
    let created = h
        .service
        .create_store(
            &ctx,
            NewStore {
                phone: Some("+20123".to_string()),
                website_url: Some("https://techhub.example".to_string()),
                ..new_store("Tech Hub", CAIRO)
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();

    let response = h
        .service
        .update_store(
            &ctx,
            created.id,
            StoreUpdate {
                name: Patch::Present("Tech Hub Plus".to_string()),
                description: Patch::Present("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(response.message, "Store updated successfully");
    let stored = h.db.stores().find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Tech Hub Plus");
    assert_eq!(stored.description, created.description);
    assert_eq!(stored.phone, created.phone);
    assert_eq!(stored.website_url, created.website_url);
    assert_eq!(stored.address, created.address);
    assert_eq!(stored.latitude, created.latitude);
    assert!(stored.updated_at.is_some());
}

#[tokio::test]
async fn test_address_change_regeocodes_and_keeps_coordinates_on_failure() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;
    let created = h
        .service
        .create_store(&ctx, new_store("Shop", CAIRO))
        .await
        .unwrap()
        .data
        .unwrap();

    let moved = h
        .service
        .update_store(
            &ctx,
            created.id,
            StoreUpdate {
                address: Patch::Present(GIZA.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    let coords = moved.coordinates().unwrap();
    assert!((coords.latitude - 30.0131).abs() < 1e-6);

    let unknown = h
        .service
        .update_store(
            &ctx,
            created.id,
            StoreUpdate {
                address: Patch::Present("Somewhere unmapped".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(unknown.address.as_deref(), Some("Somewhere unmapped"));
    assert_eq!(unknown.latitude, moved.latitude);
    assert_eq!(unknown.longitude, moved.longitude);
}

#[tokio::test]
async fn test_update_and_delete_require_ownership() {
    let h = harness().await;
    let owner = seed_user(&h.db, "owner@example.com").await;
    let intruder = seed_user(&h.db, "intruder@example.com").await;
    let store = h
        .service
        .create_store(&owner, new_store("Shop", CAIRO))
        .await
        .unwrap()
        .data
        .unwrap();

    let update = h
        .service
        .update_store(&intruder, store.id, StoreUpdate::default())
        .await
        .unwrap_err();
    let delete = h
        .service
        .delete_store(&intruder, store.id)
        .await
        .unwrap_err();
    let missing = h
        .service
        .update_store(&owner, 9999, StoreUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(update.client_message(), "You are not authorized to update this store");
    assert_eq!(delete.client_message(), "You are not authorized to delete this store");
    assert_eq!(missing.client_message(), "Store not found");
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn test_replaced_and_deleted_logos_are_removed() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;
    let store = h
        .service
        .create_store(
            &ctx,
            NewStore {
                logo: Some("aGVsbG8=".to_string()),
                ..new_store("Shop", CAIRO)
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(h.storage.uploaded_names().await.len(), 1);

    let updated = h
        .service
        .update_store(
            &ctx,
            store.id,
            StoreUpdate {
                logo: Patch::Present("d29ybGQ=".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();
    let names = h.storage.uploaded_names().await;
    assert_eq!(names.len(), 1);
    assert!(updated.logo_url.unwrap().contains(&names[0]));

    h.service.delete_store(&ctx, store.id).await.unwrap();
    assert!(h.storage.uploaded_names().await.is_empty());
}

#[tokio::test]
async fn test_delete_store_clears_owner_link() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;
    let store = h
        .service
        .create_store(&ctx, new_store("Shop", CAIRO))
        .await
        .unwrap()
        .data
        .unwrap();

    let response = h.service.delete_store(&ctx, store.id).await.unwrap();

    assert_eq!(response.message, "Store deleted successfully");
    let owner = h
        .db
        .users()
        .find_by_id(ctx.user_id().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(owner.store_id.is_none());
    assert!(h.db.stores().find_by_id(store.id).await.unwrap().is_none());

    let err = h.service.get_my_store(&ctx).await.unwrap_err();
    assert_eq!(err.client_message(), "Store not found for this user");
}

#[tokio::test]
async fn test_nearby_and_geo_search() {
    let h = harness().await;
    let cairo_owner = seed_user(&h.db, "cairo@example.com").await;
    let giza_owner = seed_user(&h.db, "giza@example.com").await;
    let far_owner = seed_user(&h.db, "far@example.com").await;

    h.service
        .create_store(&cairo_owner, new_store("Cairo Phones", CAIRO))
        .await
        .unwrap();
    h.service
        .create_store(
            &giza_owner,
            NewStore {
                category: "Books".to_string(),
                description: None,
                ..new_store("Giza Books", GIZA)
            },
        )
        .await
        .unwrap();
    // Unmapped address lands on (0, 0), far from both
    h.service
        .create_store(&far_owner, new_store("Far Phones", "Atlantis"))
        .await
        .unwrap();

    let anonymous = RequestContext::anonymous("test-request");

    let nearby = h
        .service
        .get_nearby_stores(&anonymous, 30.0444, 31.2357, None)
        .await
        .unwrap()
        .data
        .unwrap();
    let names: Vec<&str> = nearby.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Cairo Phones", "Giza Books"]);

    let geo = GeoQuery {
        center: Coordinates::new(30.0444, 31.2357),
        radius_km: 10.0,
    };
    let phones_nearby = h
        .service
        .search_stores(&anonymous, Some("PHONES"), Some(geo))
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(phones_nearby.len(), 1);
    assert_eq!(phones_nearby[0].name, "Cairo Phones");

    let phones_anywhere = h
        .service
        .search_stores(&anonymous, Some("phones"), None)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(phones_anywhere.len(), 2);
}

#[tokio::test]
async fn test_get_store_includes_products_page() {
    let h = harness().await;
    let ctx = seed_user(&h.db, "owner@example.com").await;
    let store = h
        .service
        .create_store(&ctx, new_store("Shop", CAIRO))
        .await
        .unwrap()
        .data
        .unwrap();

    let details = h
        .service
        .get_store(&RequestContext::anonymous("r"), store.id, Page::default())
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(details.store.id, store.id);
    assert!(details.products.is_empty());
}
