use actix_web::{web, HttpResponse};
use serde::Serialize;
use std::collections::HashMap;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::handlers::parse_id;
use crate::middleware::ActorId;
use crate::pagination::{PageParams, SortDirection};
use crate::repository::videos::CatalogFilter;

#[derive(Debug, serde::Deserialize, Validate)]
pub struct PublishVideoRequest {
    #[validate(length(min = 1, max = 200, message = "title must not be blank"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "description must not be blank"))]
    pub description: String,
    /// Object key produced by the upload pipeline
    #[validate(length(min = 1, message = "video file reference is missing"))]
    pub video_file: String,
    #[validate(length(min = 1, message = "thumbnail reference is missing"))]
    pub thumbnail: String,
    #[validate(range(min = 0))]
    pub duration_secs: i32,
}

#[derive(Debug, serde::Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 200, message = "title must not be blank"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "description must not be blank"))]
    pub description: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishStatusResponse {
    pub is_published: bool,
}

fn validate<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Published-video catalog with search, sort and pagination
/// GET /api/v1/videos?query=&owner_id=&sort_by=&sort_direction=&page=&limit=
pub async fn catalog(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let params = PageParams::from_query(&query);
    let direction = SortDirection::from_param(query.get("sort_direction").map(String::as_str));

    let owner_id = match query.get("owner_id") {
        Some(raw) => Some(parse_id(raw, "owner_id")?),
        None => None,
    };
    let filter = CatalogFilter {
        query: query.get("query").cloned().filter(|q| !q.is_empty()),
        owner_id,
    };

    let page = state
        .compositor
        .catalog(
            filter,
            query.get("sort_by").map(String::as_str),
            direction,
            params,
        )
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Publish a new video
/// POST /api/v1/videos
pub async fn publish_video(
    state: web::Data<AppState>,
    actor: ActorId,
    payload: web::Json<PublishVideoRequest>,
) -> Result<HttpResponse, AppError> {
    validate(&*payload)?;

    let video = state
        .content
        .publish_video(
            actor.0,
            payload.title.trim(),
            payload.description.trim(),
            &payload.video_file,
            &payload.thumbnail,
            payload.duration_secs,
        )
        .await?;
    Ok(HttpResponse::Created().json(video))
}

/// Video detail; increments the view counter and records watch history
/// GET /api/v1/videos/{video_id}
pub async fn video_detail(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let video_id = parse_id(&path.into_inner(), "video_id")?;
    let view = state.compositor.video_detail(video_id, actor.0).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Update title/description/thumbnail (owner only)
/// PATCH /api/v1/videos/{video_id}
pub async fn update_video(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<String>,
    payload: web::Json<UpdateVideoRequest>,
) -> Result<HttpResponse, AppError> {
    let video_id = parse_id(&path.into_inner(), "video_id")?;
    validate(&*payload)?;

    let video = state
        .content
        .update_video(
            actor.0,
            video_id,
            payload.title.trim(),
            payload.description.trim(),
            payload.thumbnail.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(video))
}

/// Delete a video (owner only)
/// DELETE /api/v1/videos/{video_id}
pub async fn delete_video(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let video_id = parse_id(&path.into_inner(), "video_id")?;
    state.content.delete_video(actor.0, video_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Flip the publish flag (owner only)
/// POST /api/v1/videos/{video_id}/publish-toggle
pub async fn toggle_publish(
    state: web::Data<AppState>,
    actor: ActorId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let video_id = parse_id(&path.into_inner(), "video_id")?;
    let is_published = state.content.toggle_publish(actor.0, video_id).await?;
    Ok(HttpResponse::Ok().json(PublishStatusResponse { is_published }))
}
