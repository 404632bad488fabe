use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use directory_api::endpoints::{
    businesses::{Business, BusinessUpdate, NewBusiness},
    BusinessId, MessageResponse,
};

use tracing::Instrument;

use crate::server::{auth::Admin, error::ServerError, AppState};

/// Unparseable ids cannot name a stored record, so they share the 404.
fn parse_id(raw: &str) -> Result<BusinessId, ServerError> {
    raw.parse().map_err(|_| ServerError::business_not_found())
}

pub async fn list_businesses(State(state): State<AppState>) -> Json<Vec<Business>> {
    let businesses = state.store.list();
    tracing::debug!(count = businesses.len(), "Listed businesses");
    Json(businesses)
}

pub async fn get_business(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> Result<Json<Business>, ServerError> {
    let id = parse_id(&business_id)?;
    state
        .store
        .get(&id)
        .map(Json)
        .ok_or_else(ServerError::business_not_found)
}

pub async fn create_business(
    State(state): State<AppState>,
    Json(req): Json<NewBusiness>,
) -> Result<(StatusCode, Json<Business>), ServerError> {
    let business = req
        .validated()
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let created = state.store.insert(business).await?;

    tracing::info!(
        business_id = %created.id,
        field_of_work = %created.field_of_work,
        "Business submitted"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_business(
    Admin(admin): Admin,
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Json(update): Json<BusinessUpdate>,
) -> Result<Json<Business>, ServerError> {
    let span = tracing::info_span!("update_business", business_id = %business_id, admin = %admin.email);

    async move {
        let id = parse_id(&business_id)?;
        let updated = state.store.update(&id, &update).await?;

        tracing::info!("Business updated");
        Ok::<_, ServerError>(Json(updated))
    }
    .instrument(span)
    .await
}

pub async fn delete_business(
    Admin(admin): Admin,
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let span = tracing::info_span!("delete_business", business_id = %business_id, admin = %admin.email);

    async move {
        let id = parse_id(&business_id)?;
        state.store.remove(&id).await?;

        tracing::info!("Business deleted");
        Ok::<_, ServerError>(Json(MessageResponse {
            message: "Business deleted successfully".to_string(),
        }))
    }
    .instrument(span)
    .await
}
