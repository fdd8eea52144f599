//! Store route handlers

use actix_web::web;

use sh_core::domain::value_objects::geo::Coordinates;
use sh_core::services::GeoQuery;

use crate::dto::store::{
    CreateStoreRequest, NearbyStoresQuery, StoreDto, StorePageDto, StorePageQuery,
    StoreSearchQuery, UpdateStoreRequest,
};
use crate::handlers::{envelope, validate_request, ApiResult};
use crate::middleware::{AuthContext, JwtAuth, OptionalAuth};
use crate::state::AppState;

/// Mount `/store` routes; fixed segments are registered before `/{id}`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/store")
            .route("", web::post().to(create_store).wrap(JwtAuth::required()))
            .route("", web::get().to(get_all_stores))
            .route(
                "/my-store",
                web::get().to(get_my_store).wrap(JwtAuth::required()),
            )
            .route("/search", web::get().to(search_stores))
            .route("/nearby", web::get().to(get_nearby_stores))
            .route("/{id}", web::get().to(get_store))
            .route(
                "/{id}",
                web::put().to(update_store).wrap(JwtAuth::required()),
            )
            .route(
                "/{id}",
                web::delete().to(delete_store).wrap(JwtAuth::required()),
            ),
    );
}

/// Handler for POST /api/store
///
/// Creates the caller's store. The address is geocoded and the logo stored
/// as `stores/{user_id}/main`; both steps are best-effort.
pub async fn create_store(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    request: web::Json<CreateStoreRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state.store_service.create_store(&ctx, request.into()).await?;
    Ok(envelope(response.map(StoreDto::from)))
}

pub async fn update_store(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    request: web::Json<UpdateStoreRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state
        .store_service
        .update_store(&ctx, path.into_inner(), request.into())
        .await?;
    Ok(envelope(response.map(StoreDto::from)))
}

pub async fn delete_store(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state.store_service.delete_store(&ctx, path.into_inner()).await?;
    Ok(envelope(response))
}

/// Handler for GET /api/store/{id}?pageNumber=&pageSize=
pub async fn get_store(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<StorePageQuery>,
) -> ApiResult {
    let response = state
        .store_service
        .get_store(&ctx, path.into_inner(), query.page())
        .await?;
    Ok(envelope(response.map(StorePageDto::from)))
}

pub async fn get_my_store(AuthContext(ctx): AuthContext, state: web::Data<AppState>) -> ApiResult {
    let response = state.store_service.get_my_store(&ctx).await?;
    Ok(envelope(response.map(StorePageDto::from)))
}

pub async fn get_all_stores(OptionalAuth(ctx): OptionalAuth, state: web::Data<AppState>) -> ApiResult {
    let response = state.store_service.get_all_stores(&ctx).await?;
    Ok(envelope(response.map(|stores| {
        stores.into_iter().map(StoreDto::from).collect::<Vec<_>>()
    })))
}

/// Handler for GET /api/store/search?query=&latitude=&longitude=&radiusKm=
///
/// Text and proximity filters combine; proximity applies only when the
/// coordinates and the radius are all present, otherwise the search is
/// text-only.
pub async fn search_stores(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    query: web::Query<StoreSearchQuery>,
) -> ApiResult {
    let query = query.into_inner();
    let geo = match (query.latitude, query.longitude, query.radius_km) {
        (Some(latitude), Some(longitude), Some(radius_km)) => Some(GeoQuery {
            center: Coordinates::new(latitude, longitude),
            radius_km,
        }),
        _ => None,
    };

    let response = state
        .store_service
        .search_stores(&ctx, query.query.as_deref(), geo)
        .await?;
    Ok(envelope(response.map(|stores| {
        stores.into_iter().map(StoreDto::from).collect::<Vec<_>>()
    })))
}

/// Handler for GET /api/store/nearby?latitude=&longitude=&radiusKm=10
pub async fn get_nearby_stores(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    query: web::Query<NearbyStoresQuery>,
) -> ApiResult {
    let response = state
        .store_service
        .get_nearby_stores(&ctx, query.latitude, query.longitude, query.radius_km)
        .await?;
    Ok(envelope(response.map(|stores| {
        stores.into_iter().map(StoreDto::from).collect::<Vec<_>>()
    })))
}
