use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::handlers::parse_id;
use crate::middleware::{ActorId, MaybeActor};
use crate::pagination::PageParams;

#[derive(Debug, serde::Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 2000, message = "content must not be empty"))]
    pub content: String,
}

/// Paginated comments for a video, newest first
/// GET /api/v1/videos/{video_id}/comments?page=&limit=
pub async fn video_comments(
    state: web::Data<AppState>,
    actor: MaybeActor,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let video_id = parse_id(&path.into_inner(), "video_id")?;
    let params = PageParams::from_query(&query);

    let page = state
        .compositor
        .video_comments(video_id, actor.0, params)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Add a comment to a video
/// POST /api/v1/videos/{video_id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, AppError> {
    let video_id = parse_id(&path.into_inner(), "video_id")?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = state
        .content
        .add_comment(actor.0, video_id, payload.content.trim())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Edit a comment (owner only)
/// PATCH /api/v1/comments/{comment_id}
pub async fn update_comment(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, AppError> {
    let comment_id = parse_id(&path.into_inner(), "comment_id")?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = state
        .content
        .update_comment(actor.0, comment_id, payload.content.trim())
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment (owner only)
/// DELETE /api/v1/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let comment_id = parse_id(&path.into_inner(), "comment_id")?;
    state.content.delete_comment(actor.0, comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
