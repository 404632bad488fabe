pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

pub use config::Configuration;
pub use error::ServerError;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use secrecy::SecretString;
use services::{BusinessStore, TokenSigner};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Admin login the server accepts.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: SecretString,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BusinessStore>,
    pub token_signer: Arc<TokenSigner>,
    pub admin: Arc<AdminCredentials>,
}

/// All routes live under `/api`.
pub fn router(state: AppState, cors_allow_any: bool) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/businesses",
            get(handlers::list_businesses).post(handlers::create_business),
        )
        .route(
            "/businesses/{id}",
            get(handlers::get_business)
                .put(handlers::update_business)
                .delete(handlers::delete_business),
        )
        .route("/admin/login", post(handlers::login))
        .route("/admin/verify", get(handlers::verify_token));

    let cors = if cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
