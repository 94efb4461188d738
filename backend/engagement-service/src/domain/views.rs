//! Viewer-relative view models
//!
//! Read-only compositions over entity and relation rows. Nothing here is
//! persisted; every derived field (counts, `is_liked`, `is_subscribed`) is
//! computed at read time from currently-visible rows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Channel profile with viewer-relative subscription state.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChannelProfileView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub subscriber_count: i64,
    pub subscribed_to_count: i64,
    pub is_subscribed: bool,
}

/// Owner fields embedded in video-shaped views.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

/// Single video with owner, like state and the owner's channel state,
/// all relative to the requesting viewer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VideoDetailView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub view_count: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: Option<String>,
    pub owner_subscriber_count: i64,
    pub is_subscribed: bool,
    pub like_count: i64,
    pub is_liked: bool,
}

/// One entry of the liked-videos list: the like plus the video and its
/// owner summary, ordered by like creation time descending.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LikedVideoView {
    pub like_id: Uuid,
    pub liked_at: DateTime<Utc>,
    pub video_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub view_count: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: Option<String>,
}

/// One subscriber of a channel, annotated with that subscriber's own
/// audience size and whether the channel subscribes back.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubscriberView {
    pub subscription_id: Uuid,
    pub subscriber_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub subscriber_count: i64,
    pub subscribed_back: bool,
}

/// One channel a user subscribes to, with the channel's latest video.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribedChannelView {
    pub subscription_id: Uuid,
    pub channel_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub latest_video: Option<LatestVideo>,
}

/// Most recently created video of a subscribed channel.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LatestVideo {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Row shape the subscribed-channels query produces; split into the view
/// struct so `latest_video` is absent rather than a bundle of nulls.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubscribedChannelRow {
    pub subscription_id: Uuid,
    pub channel_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub latest_video_id: Option<Uuid>,
    pub latest_title: Option<String>,
    pub latest_thumbnail: Option<String>,
    pub latest_duration_secs: Option<i32>,
    pub latest_view_count: Option<i64>,
    pub latest_created_at: Option<DateTime<Utc>>,
}

impl From<SubscribedChannelRow> for SubscribedChannelView {
    fn from(row: SubscribedChannelRow) -> Self {
        let latest_video = match (
            row.latest_video_id,
            row.latest_title,
            row.latest_thumbnail,
            row.latest_duration_secs,
            row.latest_view_count,
            row.latest_created_at,
        ) {
            (Some(id), Some(title), Some(thumbnail), Some(duration), Some(views), Some(at)) => {
                Some(LatestVideo {
                    id,
                    title,
                    thumbnail,
                    duration_secs: duration,
                    view_count: views,
                    created_at: at,
                })
            }
            _ => None,
        };
        Self {
            subscription_id: row.subscription_id,
            channel_id: row.channel_id,
            username: row.username,
            full_name: row.full_name,
            avatar: row.avatar,
            latest_video,
        }
    }
}

/// Comment with owner summary and viewer-relative like state.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: Option<String>,
    pub like_count: i64,
    pub is_liked: bool,
}

/// Catalog listing row: video plus owner username/avatar.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VideoCatalogItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_avatar: Option<String>,
}

/// Watch-history entry: watched video with owner summary.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WatchedVideoView {
    pub video_id: Uuid,
    pub title: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub watched_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: Option<String>,
}
