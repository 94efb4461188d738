use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - channel identity plus profile fields
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Video entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration_secs: i32,
    pub view_count: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Comment entity - belongs to one video, owned by one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a like points at. Tagged variant: a row references exactly one
/// entity. `Post` is the short-text entity owned by an external service;
/// no local table backs it, so existence checks are skipped for that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "like_target", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LikeTarget {
    Video,
    Comment,
    Post,
}

impl LikeTarget {
    /// Path-segment form used by the toggle route.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "video" => Some(Self::Video),
            "comment" => Some(Self::Comment),
            "post" => Some(Self::Post),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Comment => "comment",
            Self::Post => "post",
        }
    }
}

/// Like relation row. Existence is the state: created on first toggle,
/// deleted on the second.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    pub liked_by: Uuid,
    pub target_kind: LikeTarget,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Subscription relation row: subscriber follows channel.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub channel_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_target_parse_round_trip() {
        for kind in [LikeTarget::Video, LikeTarget::Comment, LikeTarget::Post] {
            assert_eq!(LikeTarget::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(LikeTarget::parse("tweet"), None);
        assert_eq!(LikeTarget::parse(""), None);
    }
}
