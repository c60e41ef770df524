use actix_web::web;

pub mod auth;
pub mod error_page;
pub mod health;
pub mod users;
mod validation;

/// Register every route. The authorization gate is applied by the caller
/// as app-level middleware, so this is the same in production and tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes)
        .configure(users::configure_routes)
        .configure(error_page::configure_routes);
}
