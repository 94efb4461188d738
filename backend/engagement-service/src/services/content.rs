//! Owner-scoped entity mutations
//!
//! Video and comment writes: validate, check ownership, mutate. Ownership
//! failures are `Forbidden`, distinct from `NotFound`, so a caller can
//! tell "someone else's video" from "no such video". Mutations run under
//! the storage deadline and are never retried.

use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{Comment, Video};
use crate::error::{AppError, Result};
use crate::repository::{CommentRepository, VideoRepository};
use resilience::with_deadline;

#[derive(Clone)]
pub struct ContentService {
    videos: VideoRepository,
    comments: CommentRepository,
    deadline: Duration,
}

impl ContentService {
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self {
            videos: VideoRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
            deadline,
        }
    }

    pub async fn publish_video(
        &self,
        actor: Uuid,
        title: &str,
        description: &str,
        video_file: &str,
        thumbnail: &str,
        duration_secs: i32,
    ) -> Result<Video> {
        with_deadline(
            self.deadline,
            async {
                Ok(self
                    .videos
                    .create(actor, title, description, video_file, thumbnail, duration_secs)
                    .await?)
            },
            AppError::from,
        )
        .await
    }

    pub async fn update_video(
        &self,
        actor: Uuid,
        video_id: Uuid,
        title: &str,
        description: &str,
        thumbnail: Option<&str>,
    ) -> Result<Video> {
        with_deadline(
            self.deadline,
            async {
                self.owned_video(actor, video_id).await?;
                self.videos
                    .update(video_id, title, description, thumbnail)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("video {video_id}")))
            },
            AppError::from,
        )
        .await
    }

    pub async fn delete_video(&self, actor: Uuid, video_id: Uuid) -> Result<()> {
        with_deadline(
            self.deadline,
            async {
                self.owned_video(actor, video_id).await?;
                if !self.videos.delete(video_id).await? {
                    return Err(AppError::NotFound(format!("video {video_id}")));
                }
                Ok(())
            },
            AppError::from,
        )
        .await
    }

    /// Flip the publish flag; returns the new value.
    pub async fn toggle_publish(&self, actor: Uuid, video_id: Uuid) -> Result<bool> {
        with_deadline(
            self.deadline,
            async {
                let video = self.owned_video(actor, video_id).await?;
                self.videos
                    .set_published(video_id, !video.is_published)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("video {video_id}")))
            },
            AppError::from,
        )
        .await
    }

    pub async fn add_comment(
        &self,
        actor: Uuid,
        video_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        with_deadline(
            self.deadline,
            async {
                if !self.videos.exists(video_id).await? {
                    return Err(AppError::NotFound(format!("video {video_id}")));
                }
                Ok(self.comments.create(video_id, actor, content).await?)
            },
            AppError::from,
        )
        .await
    }

    pub async fn update_comment(
        &self,
        actor: Uuid,
        comment_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        with_deadline(
            self.deadline,
            async {
                self.owned_comment(actor, comment_id).await?;
                self.comments
                    .update_content(comment_id, content)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))
            },
            AppError::from,
        )
        .await
    }

    pub async fn delete_comment(&self, actor: Uuid, comment_id: Uuid) -> Result<()> {
        with_deadline(
            self.deadline,
            async {
                self.owned_comment(actor, comment_id).await?;
                if !self.comments.delete(comment_id).await? {
                    return Err(AppError::NotFound(format!("comment {comment_id}")));
                }
                Ok(())
            },
            AppError::from,
        )
        .await
    }

    async fn owned_video(&self, actor: Uuid, video_id: Uuid) -> Result<Video> {
        let video = self
            .videos
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {video_id}")))?;
        if video.owner_id != actor {
            return Err(AppError::Forbidden(
                "only the owner can modify this video".into(),
            ));
        }
        Ok(video)
    }

    async fn owned_comment(&self, actor: Uuid, comment_id: Uuid) -> Result<Comment> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))?;
        if comment.owner_id != actor {
            return Err(AppError::Forbidden(
                "only the owner can modify this comment".into(),
            ));
        }
        Ok(comment)
    }
}
