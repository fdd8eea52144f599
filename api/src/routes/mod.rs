//! Route handlers grouped by resource

pub mod auth;
pub mod health;
pub mod product;
pub mod store;
pub mod user;

use actix_web::web;

/// Mount every resource under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth::configure)
            .configure(store::configure)
            .configure(product::configure)
            .configure(user::configure),
    );
}
