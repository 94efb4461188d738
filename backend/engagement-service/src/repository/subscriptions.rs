use crate::domain::views::{SubscribedChannelRow, SubscriberView};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for Subscription relation rows. Same existence-as-state
/// toggle protocol as likes, over the (subscriber, channel) natural key.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Flip the subscription. Returns the state after the call.
    /// See `LikeRepository::toggle` for the race-free protocol.
    pub async fn toggle(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM subscriptions
            WHERE subscriber_id = $1 AND channel_id = $2
            "#,
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if deleted > 0 {
            return Ok(false);
        }

        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO subscriptions (id, subscriber_id, channel_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (subscriber_id, channel_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await?;

        if inserted.is_none() {
            tracing::debug!(
                %subscriber_id,
                %channel_id,
                "toggle race resolved: concurrent insert won, relation present"
            );
        }

        Ok(true)
    }

    pub async fn is_subscribed(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subscriptions
                WHERE subscriber_id = $1 AND channel_id = $2
            )
            "#,
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn subscriber_count(&self, channel_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM subscriptions
            WHERE channel_id = $1
            "#,
        )
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Subscribers of a channel. Each entry carries the subscriber's own
    /// audience size and whether the channel subscribes back to them.
    pub async fn subscribers_of(
        &self,
        channel_id: Uuid,
    ) -> Result<Vec<SubscriberView>, sqlx::Error> {
        sqlx::query_as::<_, SubscriberView>(
            r#"
            SELECT s.id AS subscription_id,
                   u.id AS subscriber_id, u.username, u.full_name, u.avatar,
                   (SELECT COUNT(*) FROM subscriptions s2 WHERE s2.channel_id = u.id)
                       AS subscriber_count,
                   EXISTS(
                       SELECT 1 FROM subscriptions s3
                       WHERE s3.subscriber_id = $1 AND s3.channel_id = u.id
                   ) AS subscribed_back
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.channel_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Channels a user subscribes to, each with the channel's most
    /// recently created published video (absent when there is none).
    pub async fn channels_of(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<SubscribedChannelRow>, sqlx::Error> {
        sqlx::query_as::<_, SubscribedChannelRow>(
            r#"
            SELECT s.id AS subscription_id,
                   u.id AS channel_id, u.username, u.full_name, u.avatar,
                   lv.id AS latest_video_id,
                   lv.title AS latest_title,
                   lv.thumbnail AS latest_thumbnail,
                   lv.duration_secs AS latest_duration_secs,
                   lv.view_count AS latest_view_count,
                   lv.created_at AS latest_created_at
            FROM subscriptions s
            JOIN users u ON u.id = s.channel_id
            LEFT JOIN LATERAL (
                SELECT id, title, thumbnail, duration_secs, view_count, created_at
                FROM videos
                WHERE owner_id = u.id AND is_published
                ORDER BY created_at DESC
                LIMIT 1
            ) lv ON TRUE
            WHERE s.subscriber_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await
    }
}
