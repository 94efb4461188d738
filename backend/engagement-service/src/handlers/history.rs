use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::middleware::ActorId;

/// The actor's watch history
/// GET /api/v1/history
pub async fn watch_history(
    state: web::Data<AppState>,
    actor: ActorId,
) -> Result<HttpResponse, AppError> {
    let watched = state.compositor.watch_history(actor.0).await?;
    Ok(HttpResponse::Ok().json(watched))
}
