use crate::domain::models::Video;
use crate::domain::views::{VideoCatalogItem, VideoDetailView};
use crate::pagination::SortDirection;
use sqlx::PgPool;
use uuid::Uuid;

/// Optional filters for the public video catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive title search
    pub query: Option<String>,
    /// Restrict to one owner's videos
    pub owner_id: Option<Uuid>,
}

/// Repository for Video operations
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
        sqlx::query_as::<_, Video>(
            r#"
            SELECT id, owner_id, title, description, video_file, thumbnail,
                   duration_secs, view_count, is_published, created_at
            FROM videos
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
            SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        title: &str,
        description: &str,
        video_file: &str,
        thumbnail: &str,
        duration_secs: i32,
    ) -> Result<Video, sqlx::Error> {
        sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (id, owner_id, title, description, video_file,
                                thumbnail, duration_secs, is_published, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW())
            RETURNING id, owner_id, title, description, video_file, thumbnail,
                      duration_secs, view_count, is_published, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .bind(video_file)
        .bind(thumbnail)
        .bind(duration_secs)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        video_id: Uuid,
        title: &str,
        description: &str,
        thumbnail: Option<&str>,
    ) -> Result<Option<Video>, sqlx::Error> {
        sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET title = $2, description = $3, thumbnail = COALESCE($4, thumbnail)
            WHERE id = $1
            RETURNING id, owner_id, title, description, video_file, thumbnail,
                      duration_secs, view_count, is_published, created_at
            "#,
        )
        .bind(video_id)
        .bind(title)
        .bind(description)
        .bind(thumbnail)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a video together with the likes pointing at it and at its
    /// comments. Comments and watch-history rows go via FK cascade; likes
    /// have no FK on their polymorphic target and are cleaned up here.
    pub async fn delete(&self, video_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM likes
            WHERE target_kind = 'comment'
              AND target_id IN (SELECT id FROM comments WHERE video_id = $1)
            "#,
        )
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM likes
            WHERE target_kind = 'video' AND target_id = $1
            "#,
        )
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM videos
            WHERE id = $1
            "#,
        )
        .bind(video_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }

    pub async fn set_published(
        &self,
        video_id: Uuid,
        is_published: bool,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            UPDATE videos
            SET is_published = $2
            WHERE id = $1
            RETURNING is_published
            "#,
        )
        .bind(video_id)
        .bind(is_published)
        .fetch_optional(&self.pool)
        .await
    }

    /// Monotonic view counter. Returns the count after the increment.
    pub async fn increment_views(&self, video_id: Uuid) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            UPDATE videos
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING view_count
            "#,
        )
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Single video enriched with owner channel state and like state, both
    /// relative to the requesting viewer.
    pub async fn detail_view(
        &self,
        video_id: Uuid,
        viewer: Uuid,
    ) -> Result<Option<VideoDetailView>, sqlx::Error> {
        sqlx::query_as::<_, VideoDetailView>(
            r#"
            SELECT v.id, v.title, v.description, v.video_file, v.thumbnail,
                   v.duration_secs, v.view_count, v.is_published, v.created_at,
                   u.id AS owner_id, u.username AS owner_username,
                   u.full_name AS owner_full_name, u.avatar AS owner_avatar,
                   (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id)
                       AS owner_subscriber_count,
                   EXISTS(SELECT 1 FROM subscriptions s
                          WHERE s.subscriber_id = $2 AND s.channel_id = u.id)
                       AS is_subscribed,
                   (SELECT COUNT(*) FROM likes l
                    WHERE l.target_kind = 'video' AND l.target_id = v.id)
                       AS like_count,
                   EXISTS(SELECT 1 FROM likes l
                          WHERE l.target_kind = 'video' AND l.target_id = v.id
                            AND l.liked_by = $2)
                       AS is_liked
            FROM videos v
            JOIN users u ON u.id = v.owner_id
            WHERE v.id = $1
            "#,
        )
        .bind(video_id)
        .bind(viewer)
        .fetch_optional(&self.pool)
        .await
    }

    /// Published-video catalog page. The sort column comes from a
    /// whitelist; anything unknown resolves to creation time.
    pub async fn catalog_page(
        &self,
        filter: &CatalogFilter,
        sort_by: Option<&str>,
        direction: SortDirection,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VideoCatalogItem>, sqlx::Error> {
        let sort_column = match sort_by {
            Some("view_count") => "v.view_count",
            Some("duration_secs") => "v.duration_secs",
            Some("title") => "v.title",
            _ => "v.created_at",
        };

        let query = format!(
            r#"
            SELECT v.id, v.title, v.description, v.video_file, v.thumbnail,
                   v.duration_secs, v.view_count, v.created_at,
                   u.id AS owner_id, u.username AS owner_username,
                   u.avatar AS owner_avatar
            FROM videos v
            JOIN users u ON u.id = v.owner_id
            WHERE v.is_published
              AND ($1::text IS NULL OR v.title ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR v.owner_id = $2)
            ORDER BY {} {}
            LIMIT $3 OFFSET $4
            "#,
            sort_column,
            direction.as_sql()
        );

        sqlx::query_as::<_, VideoCatalogItem>(&query)
            .bind(filter.query.as_deref())
            .bind(filter.owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn catalog_count(&self, filter: &CatalogFilter) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM videos v
            WHERE v.is_published
              AND ($1::text IS NULL OR v.title ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR v.owner_id = $2)
            "#,
        )
        .bind(filter.query.as_deref())
        .bind(filter.owner_id)
        .fetch_one(&self.pool)
        .await
    }
}
