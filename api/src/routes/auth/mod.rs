//! Authentication route handlers
//!
//! This module contains the account endpoints:
//! - Email/password login and registration
//! - Token refresh and logout
//! - Password change, forgot-password and reset

pub mod login;
pub mod logout;
pub mod password;
pub mod refresh;
pub mod register;

use actix_web::web;

use crate::middleware::JwtAuth;

/// Mount `/auth` routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login::login))
            .route("/register", web::post().to(register::register))
            .route("/refresh", web::post().to(refresh::refresh_token))
            .route(
                "/logout",
                web::post().to(logout::logout).wrap(JwtAuth::required()),
            )
            .route(
                "/change-password",
                web::post()
                    .to(password::change_password)
                    .wrap(JwtAuth::required()),
            )
            .route("/forgot-password", web::post().to(password::forgot_password))
            .route("/reset-password", web::post().to(password::reset_password))
            .route("/verify-reset-token", web::get().to(password::verify_reset_token)),
    );
}
