use crate::domain::models::LikeTarget;
use crate::domain::views::LikedVideoView;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for Like relation rows. Row existence is the like state;
/// the natural-key uniqueness constraint makes concurrent toggles
/// converge without duplicates.
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Flip the like relation for one natural key. Returns the state after
    /// the call: true = present, false = absent.
    ///
    /// Protocol: a conditional delete first; if a row went away, the
    /// relation is now absent. Otherwise a unique-guarded insert; if the
    /// insert conflicts, a concurrent toggle already created the row, and
    /// the relation is present either way. Both statements are atomic, so
    /// no interleaving can produce duplicate rows or a state the caller
    /// was not told about.
    pub async fn toggle(
        &self,
        liked_by: Uuid,
        target_kind: LikeTarget,
        target_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE liked_by = $1 AND target_kind = $2 AND target_id = $3
            "#,
        )
        .bind(liked_by)
        .bind(target_kind)
        .bind(target_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if deleted > 0 {
            return Ok(false);
        }

        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO likes (id, liked_by, target_kind, target_id, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (liked_by, target_kind, target_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(liked_by)
        .bind(target_kind)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await?;

        if inserted.is_none() {
            tracing::debug!(
                %liked_by,
                target_kind = target_kind.as_str(),
                %target_id,
                "toggle race resolved: concurrent insert won, relation present"
            );
        }

        Ok(true)
    }

    pub async fn is_liked_by(
        &self,
        user_id: Uuid,
        target_kind: LikeTarget,
        target_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE liked_by = $1 AND target_kind = $2 AND target_id = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(target_kind)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn count_for_target(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM likes
            WHERE target_kind = $1 AND target_id = $2
            "#,
        )
        .bind(target_kind)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Videos the user has liked, newest like first, each carrying the
    /// video owner's summary.
    pub async fn liked_videos(&self, user_id: Uuid) -> Result<Vec<LikedVideoView>, sqlx::Error> {
        sqlx::query_as::<_, LikedVideoView>(
            r#"
            SELECT l.id AS like_id, l.created_at AS liked_at,
                   v.id AS video_id, v.title, v.description, v.video_file,
                   v.thumbnail, v.duration_secs, v.view_count, v.is_published,
                   v.created_at,
                   u.id AS owner_id, u.username AS owner_username,
                   u.full_name AS owner_full_name, u.avatar AS owner_avatar
            FROM likes l
            JOIN videos v ON v.id = l.target_id
            JOIN users u ON u.id = v.owner_id
            WHERE l.liked_by = $1 AND l.target_kind = 'video'
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
