use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::middleware::MaybeActor;

/// Channel profile by username, viewer-relative subscription state
/// GET /api/v1/channels/{username}
pub async fn channel_profile(
    state: web::Data<AppState>,
    actor: MaybeActor,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    if username.trim().is_empty() {
        return Err(AppError::Validation("username is missing".into()));
    }

    let profile = state
        .compositor
        .channel_profile(&username, actor.0)
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}
