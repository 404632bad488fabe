mod admin;
mod businesses;

pub use admin::{login, verify_token};
pub use businesses::{
    create_business, delete_business, get_business, list_businesses, update_business,
};

use axum::Json;
use directory_api::endpoints::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
