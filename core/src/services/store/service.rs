//! Store service implementation

use std::sync::Arc;

use chrono::Utc;
use sh_shared::types::{ApiResponse, Patch};

use crate::domain::entities::store::Store;
use crate::domain::value_objects::commands::{NewStore, Page, StoreUpdate};
use crate::domain::value_objects::geo::{Coordinates, DEFAULT_NEARBY_RADIUS_KM};
use crate::domain::value_objects::read_models::StoreDetails;
use crate::domain::value_objects::request_context::RequestContext;
use crate::errors::{DomainResult, StoreError};
use crate::repositories::{ProductRepository, StoreRepository};
use crate::services::external::{Geocoder, ImageStorage};

/// Geographic filter for store searches
#[derive(Debug, Clone, Copy)]
pub struct GeoQuery {
    pub center: Coordinates,
    pub radius_km: f64,
}

pub struct StoreService {
    store_repository: Arc<dyn StoreRepository>,
    product_repository: Arc<dyn ProductRepository>,
    image_storage: Arc<dyn ImageStorage>,
    geocoder: Arc<dyn Geocoder>,
}

impl StoreService {
    pub fn new(
        store_repository: Arc<dyn StoreRepository>,
        product_repository: Arc<dyn ProductRepository>,
        image_storage: Arc<dyn ImageStorage>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            store_repository,
            product_repository,
            image_storage,
            geocoder,
        }
    }

    /// Create the caller's store.
    ///
    /// Geocoding falls back to (0, 0) and a failed logo upload leaves the
    /// logo empty; neither fails the request.
    pub async fn create_store(
        &self,
        ctx: &RequestContext,
        command: NewStore,
    ) -> DomainResult<ApiResponse<Store>> {
        let user_id = ctx.user_id()?;

        if self.store_repository.find_by_user_id(user_id).await?.is_some() {
            return Err(StoreError::AlreadyHasStore.into());
        }

        let address = command
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        let (name, address) = match address {
            Some(address) if !command.name.trim().is_empty() => {
                (command.name.trim().to_string(), address)
            }
            _ => return Err(StoreError::MissingRequiredFields.into()),
        };

        let coordinates = match self.geocoder.geocode(&address).await {
            Some(coordinates) => coordinates,
            None => {
                tracing::warn!(request_id = %ctx.request_id, user_id, "Geocoding failed; storing (0, 0)");
                Coordinates::origin()
            }
        };

        let mut store = Store::new(user_id, name, command.category.trim());
        store.store_type = command.store_type;
        store.address = Some(address);
        store.phone = command.phone;
        store.description = command.description;
        store.whatsapp_phone = command.whatsapp_phone;
        store.facebook_url = command.facebook_url;
        store.instagram_url = command.instagram_url;
        store.website_url = command.website_url;
        store.set_coordinates(coordinates);

        if let Some(logo) = command.logo.filter(|l| !l.trim().is_empty()) {
            store.logo_url = self
                .upload_logo(ctx, &logo, &format!("stores/{user_id}/main"))
                .await;
        }

        let store = self.store_repository.create_for_owner(store).await?;

        tracing::info!(request_id = %ctx.request_id, user_id, store_id = store.id, "Store created");
        Ok(ApiResponse::created(store, "Store created successfully"))
    }

    /// Sparse update of a store owned by the caller.
    ///
    /// Blank values leave fields unchanged. A changed address is re-geocoded;
    /// the old coordinates are kept when geocoding fails.
    pub async fn update_store(
        &self,
        ctx: &RequestContext,
        store_id: i64,
        update: StoreUpdate,
    ) -> DomainResult<ApiResponse<Store>> {
        let user_id = ctx.user_id()?;
        let mut store = self
            .store_repository
            .find_by_id(store_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        if !store.is_owned_by(user_id) {
            tracing::info!(request_id = %ctx.request_id, user_id, store_id, "Store update rejected: not owner");
            return Err(StoreError::NotAuthorizedToUpdate.into());
        }

        let previous_address = store.address.clone();

        update.name.non_blank().apply_to(&mut store.name);
        update.category.non_blank().apply_to(&mut store.category);
        update.description.non_blank().apply_to_option(&mut store.description);
        update.address.non_blank().apply_to_option(&mut store.address);
        update.phone.non_blank().apply_to_option(&mut store.phone);
        update
            .whatsapp_phone
            .non_blank()
            .apply_to_option(&mut store.whatsapp_phone);
        update
            .website_url
            .non_blank()
            .apply_to_option(&mut store.website_url);
        update
            .facebook_url
            .non_blank()
            .apply_to_option(&mut store.facebook_url);
        update
            .instagram_url
            .non_blank()
            .apply_to_option(&mut store.instagram_url);

        if store.address != previous_address {
            if let Some(address) = store.address.clone() {
                match self.geocoder.geocode(&address).await {
                    Some(coordinates) => store.set_coordinates(coordinates),
                    None => {
                        tracing::warn!(request_id = %ctx.request_id, store_id, "Re-geocoding failed; keeping coordinates")
                    }
                }
            }
        }

        if let Patch::Present(logo) = update.logo.non_blank() {
            // A fresh name per upload so cached logos are not served
            let logical_name = format!("stores/{}/main-{}", user_id, Utc::now().timestamp_millis());
            if let Some(url) = self.upload_logo(ctx, &logo, &logical_name).await {
                if let Some(previous) = store.logo_url.replace(url) {
                    self.remove_logo(ctx, user_id, &previous).await;
                }
            }
        }

        store.touch();
        self.store_repository.update(&store).await?;

        tracing::info!(request_id = %ctx.request_id, user_id, store_id, "Store updated");
        Ok(ApiResponse::success(store, "Store updated successfully"))
    }

    /// Delete a store owned by the caller together with its products
    pub async fn delete_store(
        &self,
        ctx: &RequestContext,
        store_id: i64,
    ) -> DomainResult<ApiResponse<()>> {
        let user_id = ctx.user_id()?;
        let store = self
            .store_repository
            .find_by_id(store_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        if !store.is_owned_by(user_id) {
            tracing::info!(request_id = %ctx.request_id, user_id, store_id, "Store delete rejected: not owner");
            return Err(StoreError::NotAuthorizedToDelete.into());
        }

        if !self
            .store_repository
            .delete_for_owner(store.id, user_id)
            .await?
        {
            return Err(StoreError::NotFound.into());
        }

        if let Some(url) = store.logo_url.as_deref() {
            self.remove_logo(ctx, user_id, url).await;
        }

        tracing::info!(request_id = %ctx.request_id, user_id, store_id, "Store deleted");
        Ok(ApiResponse::success((), "Store deleted successfully"))
    }

    /// A store with one page of its products, newest first
    pub async fn get_store(
        &self,
        _ctx: &RequestContext,
        store_id: i64,
        page: Page,
    ) -> DomainResult<ApiResponse<StoreDetails>> {
        let store = self
            .store_repository
            .find_by_id(store_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        let products = self
            .product_repository
            .find_by_store(store.id, Some(page))
            .await?;

        Ok(ApiResponse::success(
            StoreDetails { store, products },
            "Store retrieved successfully",
        ))
    }

    /// The caller's own store with all of its products
    pub async fn get_my_store(&self, ctx: &RequestContext) -> DomainResult<ApiResponse<StoreDetails>> {
        let user_id = ctx.user_id()?;
        let store = self
            .store_repository
            .find_by_user_id(user_id)
            .await?
            .ok_or(StoreError::NotFoundForUser)?;
        let products = self.product_repository.find_by_store(store.id, None).await?;

        Ok(ApiResponse::success(
            StoreDetails { store, products },
            "Store retrieved successfully",
        ))
    }

    pub async fn get_all_stores(&self, _ctx: &RequestContext) -> DomainResult<ApiResponse<Vec<Store>>> {
        let stores = self.store_repository.find_all().await?;
        Ok(ApiResponse::success(stores, "Stores retrieved successfully"))
    }

    /// Text search, optionally restricted to a radius around a point.
    ///
    /// With a geo filter the radius is applied first and the text filter is
    /// applied to what remains; a blank query then keeps every nearby store.
    pub async fn search_stores(
        &self,
        ctx: &RequestContext,
        query: Option<&str>,
        geo: Option<GeoQuery>,
    ) -> DomainResult<ApiResponse<Vec<Store>>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        let stores = match geo {
            Some(geo) => {
                let mut nearby = self.stores_within(geo).await?;
                if let Some(query) = query {
                    nearby.retain(|store| store.matches_text(query));
                }
                nearby
            }
            None => match query {
                Some(query) => self.store_repository.search_text(query).await?,
                None => self.store_repository.find_all().await?,
            },
        };

        tracing::debug!(request_id = %ctx.request_id, results = stores.len(), "Store search");
        Ok(ApiResponse::success(stores, "Stores retrieved successfully"))
    }

    /// Stores within `radius_km` (default 10 km) of a point, nearest first
    pub async fn get_nearby_stores(
        &self,
        _ctx: &RequestContext,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> DomainResult<ApiResponse<Vec<Store>>> {
        let stores = self
            .stores_within(GeoQuery {
                center: Coordinates::new(latitude, longitude),
                radius_km: radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM),
            })
            .await?;
        Ok(ApiResponse::success(stores, "Stores retrieved successfully"))
    }

    async fn stores_within(&self, geo: GeoQuery) -> DomainResult<Vec<Store>> {
        let mut nearby: Vec<(f64, Store)> = self
            .store_repository
            .find_with_coordinates()
            .await?
            .into_iter()
            .filter_map(|store| {
                let distance = store.coordinates()?.distance_km(&geo.center);
                (distance <= geo.radius_km).then_some((distance, store))
            })
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(nearby.into_iter().map(|(_, store)| store).collect())
    }

    /// Best-effort removal of a logo previously stored for `user_id`
    async fn remove_logo(&self, ctx: &RequestContext, user_id: i64, url: &str) {
        let Some(logical_name) = logo_logical_name(user_id, url) else {
            return;
        };
        if let Err(e) = self.image_storage.delete(&logical_name).await {
            tracing::warn!(request_id = %ctx.request_id, logical_name, error = %e, "Failed to delete store logo");
        }
    }

    async fn upload_logo(
        &self,
        ctx: &RequestContext,
        data: &str,
        logical_name: &str,
    ) -> Option<String> {
        match self.image_storage.upload_base64(data, logical_name).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(request_id = %ctx.request_id, logical_name, error = %e, "Logo upload failed");
                None
            }
        }
    }
}

/// Recover the storage name of a store logo from its public URL
fn logo_logical_name(user_id: i64, url: &str) -> Option<String> {
    let prefix = format!("stores/{user_id}/");
    let start = url.rfind(&prefix)?;
    let path = url[start..].split(['?', '#']).next()?;
    let file = &path[prefix.len()..];
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    if stem.is_empty() || stem.contains('/') {
        return None;
    }
    Some(format!("{prefix}{stem}"))
}
