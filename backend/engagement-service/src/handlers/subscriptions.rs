use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::handlers::parse_id;
use crate::middleware::ActorId;

#[derive(Debug, Serialize)]
pub struct ToggleSubscriptionResponse {
    pub subscribed: bool,
}

/// Toggle the actor's subscription to a channel
/// POST /api/v1/subscriptions/{channel_id}/toggle
pub async fn toggle_subscription(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let channel_id = parse_id(&path.into_inner(), "channel_id")?;

    let subscribed = state
        .toggles
        .toggle_subscription(actor.0, channel_id)
        .await?;
    Ok(HttpResponse::Ok().json(ToggleSubscriptionResponse { subscribed }))
}

/// Subscribers of a channel
/// GET /api/v1/channels/{channel_id}/subscribers
pub async fn subscribers(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let channel_id = parse_id(&path.into_inner(), "channel_id")?;
    let subscribers = state.compositor.subscribers(channel_id).await?;
    Ok(HttpResponse::Ok().json(subscribers))
}

/// Channels a user subscribes to, each with its latest video
/// GET /api/v1/users/{subscriber_id}/subscriptions
pub async fn subscribed_channels(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let subscriber_id = parse_id(&path.into_inner(), "subscriber_id")?;
    let channels = state.compositor.subscribed_channels(subscriber_id).await?;
    Ok(HttpResponse::Ok().json(channels))
}
