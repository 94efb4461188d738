use crate::domain::models::User;
use crate::domain::views::ChannelProfileView;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for User lookups. User records are created and mutated by
/// the upstream identity system; this service only reads them.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, full_name, avatar, cover_image, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    /// Channel profile with viewer-relative subscription state. Username
    /// matching is case-normalized; `viewer` is None for anonymous reads.
    pub async fn channel_profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
    ) -> Result<Option<ChannelProfileView>, sqlx::Error> {
        sqlx::query_as::<_, ChannelProfileView>(
            r#"
            SELECT u.id, u.username, u.email, u.full_name, u.avatar, u.cover_image,
                   (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id)
                       AS subscriber_count,
                   (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id)
                       AS subscribed_to_count,
                   ($2::uuid IS NOT NULL AND EXISTS(
                       SELECT 1 FROM subscriptions s
                       WHERE s.subscriber_id = $2 AND s.channel_id = u.id
                   )) AS is_subscribed
            FROM users u
            WHERE u.username = LOWER($1)
            "#,
        )
        .bind(username)
        .bind(viewer)
        .fetch_optional(&self.pool)
        .await
    }
}
