use crate::domain::views::WatchedVideoView;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for the watch-history membership set. One row per
/// (user, video); a repeat view neither duplicates nor reorders.
#[derive(Clone)]
pub struct WatchHistoryRepository {
    pool: PgPool,
}

impl WatchHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Set-insert; returns true if the video entered the history.
    pub async fn record(&self, user_id: Uuid, video_id: Uuid) -> Result<bool, sqlx::Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO watch_history (user_id, video_id, watched_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, video_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    /// Watched videos with owner summaries, in first-watched order.
    pub async fn watched_videos(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WatchedVideoView>, sqlx::Error> {
        sqlx::query_as::<_, WatchedVideoView>(
            r#"
            SELECT v.id AS video_id, v.title, v.thumbnail, v.duration_secs,
                   v.view_count, v.created_at, w.watched_at,
                   u.id AS owner_id, u.username AS owner_username,
                   u.full_name AS owner_full_name, u.avatar AS owner_avatar
            FROM watch_history w
            JOIN videos v ON v.id = w.video_id
            JOIN users u ON u.id = v.owner_id
            WHERE w.user_id = $1
            ORDER BY w.watched_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
