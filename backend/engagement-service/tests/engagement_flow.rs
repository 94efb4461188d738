//! End-to-end engagement flows against a real PostgreSQL.
//!
//! Requires TEST_DATABASE_URL; every test skips (with a notice) when it is
//! not set. Rows are keyed by fresh UUIDs so suites can share a database.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use engagement_service::domain::models::LikeTarget;
use engagement_service::error::AppError;
use engagement_service::pagination::PageParams;
use engagement_service::services::{
    ContentService, ToggleService, ViewCompositor, WatchHistoryTracker,
};

const DEADLINE: Duration = Duration::from_secs(5);

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: TEST_DATABASE_URL not set");
            return None;
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

fn toggles(pool: &PgPool) -> ToggleService {
    ToggleService::new(pool.clone(), DEADLINE)
}

fn compositor(pool: &PgPool) -> ViewCompositor {
    let tracker = WatchHistoryTracker::new(pool.clone(), DEADLINE);
    ViewCompositor::new(pool.clone(), tracker, DEADLINE, 2)
}

fn content(pool: &PgPool) -> ContentService {
    ContentService::new(pool.clone(), DEADLINE)
}

async fn seed_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    let name = format!("user_{}", id.simple());
    sqlx::query(
        "INSERT INTO users (id, username, email, full_name) VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind(&name)
    .bind(format!("{name}@example.com"))
    .bind("Test User")
    .execute(pool)
    .await
    .expect("seed user");
    id
}

async fn seed_video(pool: &PgPool, owner: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO videos (id, owner_id, title, description, video_file, thumbnail, duration_secs)
        VALUES ($1, $2, 'a video', 'about nothing', 'v.mp4', 't.png', 30)
        "#,
    )
    .bind(id)
    .bind(owner)
    .execute(pool)
    .await
    .expect("seed video");
    id
}

async fn like_rows(pool: &PgPool, user: Uuid, target: Uuid) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM likes WHERE liked_by = $1 AND target_kind = 'video' AND target_id = $2",
    )
    .bind(user)
    .bind(target)
    .fetch_one(pool)
    .await
    .expect("count likes")
}

#[tokio::test]
async fn like_round_trip_leaves_no_residual_row() {
    let Some(pool) = test_pool().await else { return };
    let user = seed_user(&pool).await;
    let video = seed_video(&pool, user).await;
    let svc = toggles(&pool);

    let first = svc
        .toggle_like(user, LikeTarget::Video, video)
        .await
        .unwrap();
    assert!(first, "first toggle turns the like on");
    assert_eq!(like_rows(&pool, user, video).await, 1);

    let second = svc
        .toggle_like(user, LikeTarget::Video, video)
        .await
        .unwrap();
    assert!(!second, "second toggle turns it off");
    assert_eq!(like_rows(&pool, user, video).await, 0);

    let third = svc
        .toggle_like(user, LikeTarget::Video, video)
        .await
        .unwrap();
    assert!(third, "third toggle recreates the relation");
    assert_eq!(like_rows(&pool, user, video).await, 1);
}

#[tokio::test]
async fn concurrent_toggles_never_leave_duplicates() {
    let Some(pool) = test_pool().await else { return };
    let user = seed_user(&pool).await;
    let video = seed_video(&pool, user).await;

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let svc = toggles(&pool);
        tasks.push(tokio::spawn(async move {
            svc.toggle_like(user, LikeTarget::Video, video).await
        }));
    }
    for task in tasks {
        // Contention must never surface as an error; every caller gets a
        // definite post-call state.
        task.await.unwrap().expect("toggle under contention");
    }

    let rows = like_rows(&pool, user, video).await;
    assert!(rows == 0 || rows == 1, "natural key must stay unique, got {rows}");
}

#[tokio::test]
async fn like_targets_are_validated_before_any_write() {
    let Some(pool) = test_pool().await else { return };
    let user = seed_user(&pool).await;
    let svc = toggles(&pool);

    let missing = Uuid::new_v4();
    let err = svc
        .toggle_like(user, LikeTarget::Video, missing)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(like_rows(&pool, user, missing).await, 0);
}

#[tokio::test]
async fn self_subscription_is_rejected_without_a_row() {
    let Some(pool) = test_pool().await else { return };
    let user = seed_user(&pool).await;
    let svc = toggles(&pool);

    let err = svc.toggle_subscription(user, user).await.unwrap_err();
    assert!(matches!(err, AppError::SelfSubscription));

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
            .bind(user)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn subscription_round_trip_and_channel_profile_counts() {
    let Some(pool) = test_pool().await else { return };
    let viewer = seed_user(&pool).await;
    let channel = seed_user(&pool).await;
    let svc = toggles(&pool);
    let views = compositor(&pool);

    assert!(svc.toggle_subscription(viewer, channel).await.unwrap());

    let username: String = sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
        .bind(channel)
        .fetch_one(&pool)
        .await
        .unwrap();

    let profile = views
        .channel_profile(&username, Some(viewer))
        .await
        .unwrap();
    assert_eq!(profile.subscriber_count, 1);
    assert_eq!(profile.subscribed_to_count, 0);
    assert!(profile.is_subscribed);

    // Case-normalized lookup and anonymous viewer.
    let anon = views
        .channel_profile(&username.to_uppercase(), None)
        .await
        .unwrap();
    assert!(!anon.is_subscribed);

    assert!(!svc.toggle_subscription(viewer, channel).await.unwrap());
    let profile = views
        .channel_profile(&username, Some(viewer))
        .await
        .unwrap();
    assert_eq!(profile.subscriber_count, 0);
    assert!(!profile.is_subscribed);
}

#[tokio::test]
async fn unknown_channel_profile_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let views = compositor(&pool);

    let err = views
        .channel_profile("no_such_channel_anywhere", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn video_detail_counts_match_relation_rows() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let fan_a = seed_user(&pool).await;
    let fan_b = seed_user(&pool).await;
    let video = seed_video(&pool, owner).await;
    let svc = toggles(&pool);
    let views = compositor(&pool);

    svc.toggle_like(fan_a, LikeTarget::Video, video)
        .await
        .unwrap();
    svc.toggle_like(fan_b, LikeTarget::Video, video)
        .await
        .unwrap();
    svc.toggle_subscription(fan_a, owner).await.unwrap();

    let detail = views.video_detail(video, fan_a).await.unwrap();
    assert_eq!(detail.like_count, 2);
    assert!(detail.is_liked);
    assert_eq!(detail.owner_subscriber_count, 1);
    assert!(detail.is_subscribed);

    let detail_b = views.video_detail(video, fan_b).await.unwrap();
    assert!(detail_b.is_liked);
    assert!(!detail_b.is_subscribed);
}

#[tokio::test]
async fn repeat_views_increment_counter_but_not_history() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let viewer = seed_user(&pool).await;
    let video = seed_video(&pool, owner).await;
    let views = compositor(&pool);

    let first = views.video_detail(video, viewer).await.unwrap();
    assert_eq!(first.view_count, 1, "response reflects the increment");

    let second = views.video_detail(video, viewer).await.unwrap();
    assert_eq!(second.view_count, 2);

    let history_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM watch_history WHERE user_id = $1 AND video_id = $2",
    )
    .bind(viewer)
    .bind(video)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(history_rows, 1, "watch history keeps set semantics");

    let watched = views.watch_history(viewer).await.unwrap();
    assert_eq!(watched.len(), 1);
    assert_eq!(watched[0].video_id, video);
}

#[tokio::test]
async fn liked_videos_come_back_newest_like_first() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let fan = seed_user(&pool).await;
    let first_video = seed_video(&pool, owner).await;
    let second_video = seed_video(&pool, owner).await;
    let svc = toggles(&pool);
    let views = compositor(&pool);

    svc.toggle_like(fan, LikeTarget::Video, first_video)
        .await
        .unwrap();
    // Force distinct like timestamps.
    sqlx::query("UPDATE likes SET created_at = created_at - INTERVAL '1 minute' WHERE liked_by = $1")
        .bind(fan)
        .execute(&pool)
        .await
        .unwrap();
    svc.toggle_like(fan, LikeTarget::Video, second_video)
        .await
        .unwrap();

    let liked = views.liked_videos(fan).await.unwrap();
    assert_eq!(liked.len(), 2);
    assert_eq!(liked[0].video_id, second_video);
    assert_eq!(liked[1].video_id, first_video);
    assert_eq!(liked[0].owner_id, owner);
}

#[tokio::test]
async fn subscriber_list_annotates_mutual_subscriptions() {
    let Some(pool) = test_pool().await else { return };
    let channel = seed_user(&pool).await;
    let mutual_fan = seed_user(&pool).await;
    let plain_fan = seed_user(&pool).await;
    let svc = toggles(&pool);
    let views = compositor(&pool);

    svc.toggle_subscription(mutual_fan, channel).await.unwrap();
    svc.toggle_subscription(plain_fan, channel).await.unwrap();
    svc.toggle_subscription(channel, mutual_fan).await.unwrap();

    let subscribers = views.subscribers(channel).await.unwrap();
    assert_eq!(subscribers.len(), 2);

    let mutual = subscribers
        .iter()
        .find(|s| s.subscriber_id == mutual_fan)
        .expect("mutual fan listed");
    assert!(mutual.subscribed_back);
    assert_eq!(mutual.subscriber_count, 1, "channel subscribes to them");

    let plain = subscribers
        .iter()
        .find(|s| s.subscriber_id == plain_fan)
        .expect("plain fan listed");
    assert!(!plain.subscribed_back);
    assert_eq!(plain.subscriber_count, 0);
}

#[tokio::test]
async fn subscribed_channels_carry_the_latest_video() {
    let Some(pool) = test_pool().await else { return };
    let fan = seed_user(&pool).await;
    let quiet_channel = seed_user(&pool).await;
    let busy_channel = seed_user(&pool).await;
    let svc = toggles(&pool);
    let views = compositor(&pool);

    let older = seed_video(&pool, busy_channel).await;
    sqlx::query("UPDATE videos SET created_at = created_at - INTERVAL '1 hour' WHERE id = $1")
        .bind(older)
        .execute(&pool)
        .await
        .unwrap();
    let newest = seed_video(&pool, busy_channel).await;

    svc.toggle_subscription(fan, quiet_channel).await.unwrap();
    svc.toggle_subscription(fan, busy_channel).await.unwrap();

    let channels = views.subscribed_channels(fan).await.unwrap();
    assert_eq!(channels.len(), 2);

    let busy = channels
        .iter()
        .find(|c| c.channel_id == busy_channel)
        .expect("busy channel listed");
    assert_eq!(
        busy.latest_video.as_ref().expect("has latest video").id,
        newest
    );

    let quiet = channels
        .iter()
        .find(|c| c.channel_id == quiet_channel)
        .expect("quiet channel listed");
    assert!(quiet.latest_video.is_none());
}

#[tokio::test]
async fn comment_pages_window_after_sort() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let commenter = seed_user(&pool).await;
    let video = seed_video(&pool, owner).await;
    let contents = content(&pool);
    let views = compositor(&pool);

    for i in 0..25 {
        let comment = contents
            .add_comment(commenter, video, &format!("comment {i}"))
            .await
            .unwrap();
        // Deterministic ordering for the window assertions below.
        sqlx::query("UPDATE comments SET created_at = NOW() + ($2 || ' seconds')::interval WHERE id = $1")
            .bind(comment.id)
            .bind(i.to_string())
            .execute(&pool)
            .await
            .unwrap();
    }

    let first = views
        .video_comments(video, Some(commenter), PageParams::from_raw(Some("1"), Some("10")))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_items, 25);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.items[0].content, "comment 24", "newest first");

    let last = views
        .video_comments(video, Some(commenter), PageParams::from_raw(Some("3"), Some("10")))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 5);

    let beyond = views
        .video_comments(video, Some(commenter), PageParams::from_raw(Some("4"), Some("10")))
        .await
        .unwrap();
    assert_eq!(beyond.items.len(), 0);
    assert_eq!(beyond.total_pages, 3);
}

#[tokio::test]
async fn comment_like_state_is_viewer_relative() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let fan = seed_user(&pool).await;
    let video = seed_video(&pool, owner).await;
    let contents = content(&pool);
    let svc = toggles(&pool);
    let views = compositor(&pool);

    let comment = contents.add_comment(owner, video, "nice").await.unwrap();
    svc.toggle_like(fan, LikeTarget::Comment, comment.id)
        .await
        .unwrap();

    let page = views
        .video_comments(video, Some(fan), PageParams::default())
        .await
        .unwrap();
    assert_eq!(page.items[0].like_count, 1);
    assert!(page.items[0].is_liked);

    let anon = views
        .video_comments(video, None, PageParams::default())
        .await
        .unwrap();
    assert_eq!(anon.items[0].like_count, 1);
    assert!(!anon.items[0].is_liked);
}

#[tokio::test]
async fn only_owners_may_mutate_videos_and_comments() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let stranger = seed_user(&pool).await;
    let video = seed_video(&pool, owner).await;
    let contents = content(&pool);

    let err = contents
        .update_video(stranger, video, "hijacked", "nope", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = contents.delete_video(stranger, video).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let comment = contents.add_comment(owner, video, "mine").await.unwrap();
    let err = contents
        .update_comment(stranger, comment.id, "stolen")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // The owner path still works.
    let updated = contents
        .update_video(owner, video, "new title", "new description", None)
        .await
        .unwrap();
    assert_eq!(updated.title, "new title");

    let flipped = contents.toggle_publish(owner, video).await.unwrap();
    assert!(!flipped, "seeded videos start published");
}

#[tokio::test]
async fn deleting_a_video_cleans_up_its_engagement() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let fan = seed_user(&pool).await;
    let video = seed_video(&pool, owner).await;
    let contents = content(&pool);
    let svc = toggles(&pool);

    let comment = contents.add_comment(fan, video, "first!").await.unwrap();
    svc.toggle_like(fan, LikeTarget::Video, video).await.unwrap();
    svc.toggle_like(owner, LikeTarget::Comment, comment.id)
        .await
        .unwrap();

    contents.delete_video(owner, video).await.unwrap();

    let orphans: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM likes WHERE target_id IN ($1, $2)",
    )
    .bind(video)
    .bind(comment.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(orphans, 0, "likes on the video and its comments are gone");

    let comments_left: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE video_id = $1")
            .bind(video)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(comments_left, 0);
}

#[tokio::test]
async fn catalog_filters_sorts_and_hides_unpublished() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let contents = content(&pool);
    let views = compositor(&pool);

    let marker = Uuid::new_v4().simple().to_string();
    let mut ids = Vec::new();
    for i in 0..3 {
        let video = contents
            .publish_video(
                owner,
                &format!("clip {marker} {i}"),
                "catalog test",
                "v.mp4",
                "t.png",
                10 * (i + 1),
            )
            .await
            .unwrap();
        sqlx::query(
            "UPDATE videos SET created_at = NOW() + ($2 || ' seconds')::interval WHERE id = $1",
        )
        .bind(video.id)
        .bind(i.to_string())
        .execute(&pool)
        .await
        .unwrap();
        ids.push(video.id);
    }
    // Unpublish one; it must drop out of the catalog.
    contents.toggle_publish(owner, ids[0]).await.unwrap();

    use engagement_service::pagination::SortDirection;
    use engagement_service::repository::videos::CatalogFilter;

    let filter = CatalogFilter {
        query: Some(marker.clone()),
        owner_id: Some(owner),
    };
    let page = views
        .catalog(
            filter.clone(),
            Some("created_at"),
            SortDirection::from_param(Some("descending")),
            PageParams::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.total_items, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, ids[2], "descending creation order");
    assert!(page.items.iter().all(|v| v.id != ids[0]));

    // Default direction is ascending.
    let ascending = views
        .catalog(filter, None, SortDirection::from_param(None), PageParams::default())
        .await
        .unwrap();
    assert_eq!(ascending.items[0].id, ids[1]);
}
