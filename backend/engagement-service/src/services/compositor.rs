//! View Compositor
//!
//! Read-only joins across entity and relation rows producing the enriched,
//! viewer-relative view models. Every derived field is a pure function of
//! currently-visible rows; the multiple reads behind one view are not
//! wrapped in a transaction - per-request eventual consistency is the
//! contract. Reads run under the storage deadline and a bounded retry;
//! the two side effects of the video-detail view (view counter, watch
//! history) are best-effort and never fail the read.

use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::views::{
    ChannelProfileView, CommentView, LikedVideoView, SubscribedChannelView, SubscriberView,
    VideoCatalogItem, VideoDetailView, WatchedVideoView,
};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::pagination::{PageParams, Paginated, SortDirection};
use crate::repository::videos::CatalogFilter;
use crate::repository::{
    CommentRepository, LikeRepository, SubscriptionRepository, UserRepository, VideoRepository,
};
use crate::services::WatchHistoryTracker;
use resilience::{with_deadline, RetryPolicy};

#[derive(Clone)]
pub struct ViewCompositor {
    users: UserRepository,
    videos: VideoRepository,
    comments: CommentRepository,
    likes: LikeRepository,
    subscriptions: SubscriptionRepository,
    history: WatchHistoryTracker,
    deadline: Duration,
    read_retry: RetryPolicy,
}

impl ViewCompositor {
    pub fn new(
        pool: PgPool,
        history: WatchHistoryTracker,
        deadline: Duration,
        read_retries: u32,
    ) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            videos: VideoRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            likes: LikeRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool),
            history,
            deadline,
            read_retry: RetryPolicy {
                max_retries: read_retries,
                ..RetryPolicy::default()
            },
        }
    }

    /// Bounded read: deadline over the whole attempt sequence, transient
    /// failures retried per policy.
    async fn read<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        with_deadline(
            self.deadline,
            async { self.read_retry.run(op).await.map_err(AppError::from) },
            AppError::from,
        )
        .await
    }

    /// Channel profile by case-normalized username, with viewer-relative
    /// subscription state (anonymous viewers see `is_subscribed: false`).
    pub async fn channel_profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
    ) -> Result<ChannelProfileView> {
        let profile = self
            .read(|| self.users.channel_profile(username, viewer))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("channel {username}")))?;
        metrics::record_view_composed("channel_profile");
        Ok(profile)
    }

    /// Video detail for an authenticated viewer. Observable side effects:
    /// the view counter increments and the video enters the viewer's watch
    /// history. Both are best-effort; a failure is logged and the read
    /// still succeeds (with the pre-increment count).
    pub async fn video_detail(&self, video_id: Uuid, actor: Uuid) -> Result<VideoDetailView> {
        let mut view = self
            .read(|| self.videos.detail_view(video_id, actor))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {video_id}")))?;
        metrics::record_view_composed("video_detail");

        let increment = with_deadline(
            self.deadline,
            async {
                self.videos
                    .increment_views(video_id)
                    .await
                    .map_err(AppError::from)
            },
            AppError::from,
        )
        .await;
        match increment {
            Ok(Some(count)) => view.view_count = count,
            Ok(None) => {} // deleted between read and increment
            Err(e) => {
                metrics::record_side_effect_failure("view_count");
                tracing::warn!(%video_id, error = %e, "view-count increment failed, serving stale count");
            }
        }

        if let Err(e) = self.history.record_view(actor, video_id).await {
            metrics::record_side_effect_failure("watch_history");
            tracing::warn!(%video_id, %actor, error = %e, "watch-history insert failed");
        }

        Ok(view)
    }

    /// Videos the actor has liked, newest like first.
    pub async fn liked_videos(&self, actor: Uuid) -> Result<Vec<LikedVideoView>> {
        let videos = self.read(|| self.likes.liked_videos(actor)).await?;
        metrics::record_view_composed("liked_videos");
        Ok(videos)
    }

    /// Subscribers of a channel, each with their own audience size and the
    /// mutual-subscription flag.
    pub async fn subscribers(&self, channel_id: Uuid) -> Result<Vec<SubscriberView>> {
        if !self.read(|| self.users.exists(channel_id)).await? {
            return Err(AppError::NotFound(format!("channel {channel_id}")));
        }
        let subscribers = self
            .read(|| self.subscriptions.subscribers_of(channel_id))
            .await?;
        metrics::record_view_composed("subscribers");
        Ok(subscribers)
    }

    /// Channels a user subscribes to, each with its latest video.
    pub async fn subscribed_channels(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<SubscribedChannelView>> {
        if !self.read(|| self.users.exists(subscriber_id)).await? {
            return Err(AppError::NotFound(format!("user {subscriber_id}")));
        }
        let rows = self
            .read(|| self.subscriptions.channels_of(subscriber_id))
            .await?;
        metrics::record_view_composed("subscribed_channels");
        Ok(rows.into_iter().map(SubscribedChannelView::from).collect())
    }

    /// One page of a video's comments, newest first, like state relative
    /// to the (possibly anonymous) viewer.
    pub async fn video_comments(
        &self,
        video_id: Uuid,
        viewer: Option<Uuid>,
        params: PageParams,
    ) -> Result<Paginated<CommentView>> {
        if !self.read(|| self.videos.exists(video_id)).await? {
            return Err(AppError::NotFound(format!("video {video_id}")));
        }

        let (items, total) = tokio::try_join!(
            self.read(|| {
                self.comments
                    .page_for_video(video_id, viewer, params.limit, params.offset())
            }),
            self.read(|| self.comments.count_for_video(video_id)),
        )?;
        metrics::record_view_composed("video_comments");
        Ok(Paginated::new(items, params, total))
    }

    /// Published-video catalog with optional title/owner filters.
    pub async fn catalog(
        &self,
        filter: CatalogFilter,
        sort_by: Option<&str>,
        direction: SortDirection,
        params: PageParams,
    ) -> Result<Paginated<VideoCatalogItem>> {
        let (items, total) = tokio::try_join!(
            self.read(|| {
                self.videos
                    .catalog_page(&filter, sort_by, direction, params.limit, params.offset())
            }),
            self.read(|| self.videos.catalog_count(&filter)),
        )?;
        metrics::record_view_composed("catalog");
        Ok(Paginated::new(items, params, total))
    }

    /// The actor's watch history with owner summaries.
    pub async fn watch_history(&self, actor: Uuid) -> Result<Vec<WatchedVideoView>> {
        let watched = self.history.watched_videos(actor).await?;
        metrics::record_view_composed("watch_history");
        Ok(watched)
    }
}
