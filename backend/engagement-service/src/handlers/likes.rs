use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::app_state::AppState;
use crate::domain::models::LikeTarget;
use crate::error::AppError;
use crate::handlers::parse_id;
use crate::middleware::ActorId;

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
}

/// Toggle the actor's like on a target
/// POST /api/v1/likes/{kind}/{target_id}/toggle
pub async fn toggle_like(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (kind_raw, target_raw) = path.into_inner();

    let kind = LikeTarget::parse(&kind_raw)
        .ok_or_else(|| AppError::Validation(format!("unknown like target: {kind_raw}")))?;
    let target_id = parse_id(&target_raw, "target_id")?;

    let liked = state.toggles.toggle_like(actor.0, kind, target_id).await?;
    Ok(HttpResponse::Ok().json(ToggleLikeResponse { liked }))
}

/// Videos the actor has liked, newest like first
/// GET /api/v1/likes/videos
pub async fn liked_videos(
    state: web::Data<AppState>,
    actor: ActorId,
) -> Result<HttpResponse, AppError> {
    let videos = state.compositor.liked_videos(actor.0).await?;
    Ok(HttpResponse::Ok().json(videos))
}
