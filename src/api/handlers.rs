use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::auth::bearer_token;
use crate::error::{AppError, AppResult};
use crate::models::{
    AddLiveEvent, FriendshipConfirmation, FriendshipRequest, LiveEvent, RecommendationAccuracy,
    RecommendationRequest, RecommendedCategory, ValidationRequest,
};

use super::AppState;

/// Decrypts an opaque request body and parses the plaintext as JSON
fn decrypt_body<T: DeserializeOwned>(state: &AppState, body: &str) -> AppResult<T> {
    let plaintext = state.cipher.decrypt(body)?;
    serde_json::from_str(&plaintext)
        .map_err(|e| AppError::InvalidInput(format!("Malformed request body: {}", e)))
}

/// Requires a bearer token resolving to the user the body claims to be from
async fn authorize(state: &AppState, headers: &HeaderMap, declared_user: &str) -> AppResult<()> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Token not available.".to_string()))?;

    let resolved = state.verifier.verify_token(&token).await?;
    if resolved.as_deref() == Some(declared_user) {
        return Ok(());
    }

    let resolved = resolved.unwrap_or_else(|| "unknown".to_string());
    tracing::error!(
        resolved = %resolved,
        declared = %declared_user,
        "Token identity does not match request body"
    );
    Err(AppError::Forbidden(format!(
        "User from the authentication service is {} and that from body is {}.",
        resolved, declared_user
    )))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Category recommendation: decrypt, authorize, run the recommendation flow.
/// Responds 400 when the model yields no result.
pub async fn recommend_places(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<RecommendedCategory>> {
    let request: RecommendationRequest = decrypt_body(&state, &body)?;
    authorize(&state, &headers, &request.user).await?;

    match state
        .recommendations
        .recommend_place_of_category(&request)
        .await?
    {
        Some(category) => Ok(Json(category)),
        None => Err(AppError::NoResult),
    }
}

/// Geofencing validation of a client-proposed category
pub async fn check_validity(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<bool>> {
    let request: ValidationRequest = decrypt_body(&state, &body)?;
    authorize(&state, &headers, &request.user).await?;

    match state
        .recommendations
        .should_advise_place_category(&request)
        .await?
    {
        Some(valid) => Ok(Json(valid)),
        None => Err(AppError::NoResult),
    }
}

/// Model retraining with a fresh labelled record
pub async fn train_model(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<RecommendationAccuracy>> {
    let request: ValidationRequest = decrypt_body(&state, &body)?;
    authorize(&state, &headers, &request.user).await?;

    match state.recommendations.train_again_model(&request).await? {
        Some(accuracy) => Ok(Json(accuracy)),
        None => Err(AppError::NoResult),
    }
}

#[derive(Debug, Deserialize)]
pub struct LiveEventsQuery {
    pub user: String,
}

/// Active live events visible to a user
pub async fn get_live_events(
    State(state): State<AppState>,
    Query(query): Query<LiveEventsQuery>,
) -> AppResult<Json<Vec<LiveEvent>>> {
    let events = state.live_events.live_events_for(&query.user).await?;
    Ok(Json(events))
}

/// Publish a new live event
pub async fn add_live_event(
    State(state): State<AppState>,
    Json(request): Json<AddLiveEvent>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let event_id = state.live_events.add_live_event(&request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": event_id }))))
}

/// Send a friendship request
pub async fn add_friendship(
    State(state): State<AppState>,
    Json(request): Json<FriendshipRequest>,
) -> AppResult<StatusCode> {
    state.friendships.send_friendship_request(&request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Confirm a pending friendship request
pub async fn confirm_friendship(
    State(state): State<AppState>,
    Json(confirmation): Json<FriendshipConfirmation>,
) -> AppResult<StatusCode> {
    state.friendships.confirm_friendship(&confirmation).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove an existing friendship
pub async fn remove_friendship(
    State(state): State<AppState>,
    Json(request): Json<FriendshipRequest>,
) -> AppResult<StatusCode> {
    state.friendships.remove_friendship(&request).await?;
    Ok(StatusCode::NO_CONTENT)
}
