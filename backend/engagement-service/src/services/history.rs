//! Watch History Tracker
//!
//! Append-once-per-video membership set on a user's viewing record. A
//! repeat view is a no-op: no duplicate entry and no reordering.

use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::views::WatchedVideoView;
use crate::error::{AppError, Result};
use crate::repository::WatchHistoryRepository;
use resilience::with_deadline;

#[derive(Clone)]
pub struct WatchHistoryTracker {
    repo: WatchHistoryRepository,
    deadline: Duration,
}

impl WatchHistoryTracker {
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self {
            repo: WatchHistoryRepository::new(pool),
            deadline,
        }
    }

    /// Add the video to the actor's watch-history set. Returns true when
    /// this was the first view.
    pub async fn record_view(&self, actor: Uuid, video_id: Uuid) -> Result<bool> {
        with_deadline(
            self.deadline,
            async { Ok(self.repo.record(actor, video_id).await?) },
            AppError::from,
        )
        .await
    }

    /// The actor's watched videos in first-watched order.
    pub async fn watched_videos(&self, actor: Uuid) -> Result<Vec<WatchedVideoView>> {
        with_deadline(
            self.deadline,
            async { Ok(self.repo.watched_videos(actor).await?) },
            AppError::from,
        )
        .await
    }
}
