//! Product route handlers: CRUD, search, favorites, views, ratings

use actix_web::web;

use sh_core::domain::value_objects::read_models::ProductDetails;

use crate::dto::product::{
    CreateProductRequest, ProductDto, ProductPriceDto, ProductRatingDto, ProductSearchQuery,
    RateProductRequest, UpdateProductRequest,
};
use crate::handlers::{envelope, validate_request, ApiResult};
use crate::middleware::{AuthContext, JwtAuth, OptionalAuth};
use crate::state::AppState;

/// Mount `/product` routes; fixed segments are registered before `/{id}`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/product")
            .route("", web::post().to(create_product).wrap(JwtAuth::required()))
            .route("/search", web::get().to(search_products))
            .route(
                "/favorites",
                web::get().to(get_favorite_products).wrap(JwtAuth::required()),
            )
            .route(
                "/history",
                web::get().to(get_view_history).wrap(JwtAuth::required()),
            )
            .route(
                "/recommended",
                web::get()
                    .to(get_recommended_products)
                    .wrap(JwtAuth::required()),
            )
            .route("/on-sale", web::get().to(get_on_sale_products))
            .route("/store/{store_id}", web::get().to(get_products_by_store))
            .route("/{id}", web::get().to(get_product).wrap(JwtAuth::optional()))
            .route(
                "/{id}",
                web::put().to(update_product).wrap(JwtAuth::required()),
            )
            .route(
                "/{id}",
                web::delete().to(delete_product).wrap(JwtAuth::required()),
            )
            .route(
                "/{id}/favorite",
                web::post().to(add_to_favorites).wrap(JwtAuth::required()),
            )
            .route(
                "/{id}/favorite",
                web::delete()
                    .to(remove_from_favorites)
                    .wrap(JwtAuth::required()),
            )
            .route(
                "/{id}/rating",
                web::post().to(rate_product).wrap(JwtAuth::required()),
            )
            .route("/{id}/ratings", web::get().to(get_product_ratings))
            .route(
                "/{id}/view",
                web::post().to(add_product_view).wrap(JwtAuth::required()),
            )
            .route("/{id}/price-history", web::get().to(get_price_history)),
    );
}

fn product_list(products: Vec<ProductDetails>) -> Vec<ProductDto> {
    products.into_iter().map(ProductDto::from).collect()
}

/// Handler for POST /api/product
///
/// Adds a product to the caller's store. Images are base64 strings stored
/// in order; an image that fails to upload is skipped.
pub async fn create_product(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    request: web::Json<CreateProductRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state.product_service.create_product(&ctx, request.into()).await?;
    Ok(envelope(response.map(ProductDto::from)))
}

/// Handler for PUT /api/product/{id}
///
/// Sparse update. A changed price appends a price-history entry.
pub async fn update_product(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    request: web::Json<UpdateProductRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state
        .product_service
        .update_product(&ctx, path.into_inner(), request.into())
        .await?;
    Ok(envelope(response.map(ProductDto::from)))
}

pub async fn delete_product(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .product_service
        .delete_product(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response))
}

/// Handler for GET /api/product/{id}
///
/// Anonymous callers get the product; signed-in callers also get
/// `isFavorite` and have the view recorded.
pub async fn get_product(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state.product_service.get_product(&ctx, path.into_inner()).await?;
    Ok(envelope(response.map(ProductDto::from)))
}

pub async fn get_products_by_store(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .product_service
        .get_products_by_store(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response.map(product_list)))
}

/// Handler for GET /api/product/search?query=&storeId=&category=&minPrice=&maxPrice=
pub async fn search_products(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    query: web::Query<ProductSearchQuery>,
) -> ApiResult {
    let response = state
        .product_service
        .search_products(&ctx, query.into_inner().into())
        .await?;
    Ok(envelope(response.map(product_list)))
}

pub async fn add_to_favorites(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .product_service
        .add_to_favorites(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response))
}

pub async fn remove_from_favorites(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .product_service
        .remove_from_favorites(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response))
}

pub async fn get_favorite_products(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
) -> ApiResult {
    let response = state.product_service.get_favorite_products(&ctx).await?;
    Ok(envelope(response.map(product_list)))
}

pub async fn add_product_view(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .product_service
        .add_product_view(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response))
}

/// Handler for GET /api/product/history
///
/// The caller's 50 most recently viewed distinct products.
pub async fn get_view_history(AuthContext(ctx): AuthContext, state: web::Data<AppState>) -> ApiResult {
    let response = state.product_service.get_view_history(&ctx).await?;
    Ok(envelope(response.map(product_list)))
}

/// Handler for POST /api/product/{id}/rating
///
/// Rating again replaces the caller's previous rating.
pub async fn rate_product(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    request: web::Json<RateProductRequest>,
) -> ApiResult {
    let request = request.into_inner();
    validate_request(&request)?;

    let response = state
        .product_service
        .rate_product(&ctx, path.into_inner(), request.into())
        .await?;
    Ok(envelope(response.map(ProductRatingDto::from)))
}

pub async fn get_product_ratings(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .product_service
        .get_product_ratings(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response.map(|ratings| {
        ratings.into_iter().map(ProductRatingDto::from).collect::<Vec<_>>()
    })))
}

pub async fn get_recommended_products(
    AuthContext(ctx): AuthContext,
    state: web::Data<AppState>,
) -> ApiResult {
    let response = state.product_service.get_recommended_products(&ctx).await?;
    Ok(envelope(response.map(product_list)))
}

pub async fn get_on_sale_products(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
) -> ApiResult {
    let response = state.product_service.get_on_sale_products(&ctx).await?;
    Ok(envelope(response.map(product_list)))
}

pub async fn get_price_history(
    OptionalAuth(ctx): OptionalAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult {
    let response = state
        .product_service
        .get_price_history(&ctx, path.into_inner())
        .await?;
    Ok(envelope(response.map(ProductPriceDto::history)))
}
