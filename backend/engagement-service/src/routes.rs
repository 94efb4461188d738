//! Route configuration
//!
//! Centralized route setup. The identity middleware runs on the whole API
//! scope; per-route actor requirements are expressed by the extractors.

use actix_web::{web, HttpResponse};

use crate::handlers;
use crate::middleware::IdentityMiddleware;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(metrics_handler))
        .route("/health", web::get().to(handlers::health::health_check))
        .route(
            "/health/ready",
            web::get().to(handlers::health::readiness_check),
        )
        .service(
            web::scope("/api/v1")
                .wrap(IdentityMiddleware)
                // Relation toggles
                .route(
                    "/likes/{kind}/{target_id}/toggle",
                    web::post().to(handlers::likes::toggle_like),
                )
                .route(
                    "/subscriptions/{channel_id}/toggle",
                    web::post().to(handlers::subscriptions::toggle_subscription),
                )
                // Composed views
                .route("/likes/videos", web::get().to(handlers::likes::liked_videos))
                .route(
                    "/channels/{username}",
                    web::get().to(handlers::channels::channel_profile),
                )
                .route(
                    "/channels/{channel_id}/subscribers",
                    web::get().to(handlers::subscriptions::subscribers),
                )
                .route(
                    "/users/{subscriber_id}/subscriptions",
                    web::get().to(handlers::subscriptions::subscribed_channels),
                )
                .route("/history", web::get().to(handlers::history::watch_history))
                // Videos
                .route("/videos", web::get().to(handlers::videos::catalog))
                .route("/videos", web::post().to(handlers::videos::publish_video))
                .route(
                    "/videos/{video_id}",
                    web::get().to(handlers::videos::video_detail),
                )
                .route(
                    "/videos/{video_id}",
                    web::patch().to(handlers::videos::update_video),
                )
                .route(
                    "/videos/{video_id}",
                    web::delete().to(handlers::videos::delete_video),
                )
                .route(
                    "/videos/{video_id}/publish-toggle",
                    web::post().to(handlers::videos::toggle_publish),
                )
                // Comments
                .route(
                    "/videos/{video_id}/comments",
                    web::get().to(handlers::comments::video_comments),
                )
                .route(
                    "/videos/{video_id}/comments",
                    web::post().to(handlers::comments::add_comment),
                )
                .route(
                    "/comments/{comment_id}",
                    web::patch().to(handlers::comments::update_comment),
                )
                .route(
                    "/comments/{comment_id}",
                    web::delete().to(handlers::comments::delete_comment),
                ),
        );
}

async fn metrics_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(crate::metrics::gather_metrics())
}
