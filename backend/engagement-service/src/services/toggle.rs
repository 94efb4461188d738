//! Relation Toggle Service
//!
//! Atomic create-or-remove over the Relation Store. The caller always gets
//! a definite post-operation state; concurrent toggles on the same natural
//! key converge without duplicate rows and without surfacing contention as
//! an error. Mutations are never retried - a retry could flip the relation
//! a second time.

use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::LikeTarget;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::repository::{
    CommentRepository, LikeRepository, SubscriptionRepository, UserRepository, VideoRepository,
};
use resilience::with_deadline;

#[derive(Clone)]
pub struct ToggleService {
    likes: LikeRepository,
    subscriptions: SubscriptionRepository,
    users: UserRepository,
    videos: VideoRepository,
    comments: CommentRepository,
    deadline: Duration,
}

impl ToggleService {
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self {
            likes: LikeRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            videos: VideoRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
            deadline,
        }
    }

    /// Flip the actor's like on a target. Returns the post-call state.
    pub async fn toggle_like(
        &self,
        actor: Uuid,
        target_kind: LikeTarget,
        target_id: Uuid,
    ) -> Result<bool> {
        with_deadline(
            self.deadline,
            async {
                // Validation happens before any relation write.
                match target_kind {
                    LikeTarget::Video => {
                        if !self.videos.exists(target_id).await? {
                            return Err(AppError::NotFound(format!("video {target_id}")));
                        }
                    }
                    LikeTarget::Comment => {
                        if !self.comments.exists(target_id).await? {
                            return Err(AppError::NotFound(format!("comment {target_id}")));
                        }
                    }
                    // Post entities live with an external service; no local
                    // existence check is possible.
                    LikeTarget::Post => {}
                }

                let liked = self.likes.toggle(actor, target_kind, target_id).await?;
                metrics::record_toggle("like", liked);
                Ok(liked)
            },
            AppError::from,
        )
        .await
    }

    /// Flip the actor's subscription to a channel. Self-subscription is
    /// rejected before touching storage.
    pub async fn toggle_subscription(&self, actor: Uuid, channel_id: Uuid) -> Result<bool> {
        if actor == channel_id {
            return Err(AppError::SelfSubscription);
        }

        with_deadline(
            self.deadline,
            async {
                if !self.users.exists(channel_id).await? {
                    return Err(AppError::NotFound(format!("channel {channel_id}")));
                }

                let subscribed = self.subscriptions.toggle(actor, channel_id).await?;
                metrics::record_toggle("subscription", subscribed);
                Ok(subscribed)
            },
            AppError::from,
        )
        .await
    }
}
