//! Central application state
//!
//! Single source of truth for the dependencies handlers need. The pool is
//! the only shared mutable-ish resource; services are cheap clones over it.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::services::{ContentService, ToggleService, ViewCompositor, WatchHistoryTracker};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub toggles: ToggleService,
    pub compositor: ViewCompositor,
    pub content: ContentService,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        let deadline = config.database.statement_deadline();
        let read_retries = config.database.read_retries;

        let history = WatchHistoryTracker::new(db.clone(), deadline);
        let compositor = ViewCompositor::new(db.clone(), history, deadline, read_retries);
        let toggles = ToggleService::new(db.clone(), deadline);
        let content = ContentService::new(db.clone(), deadline);

        Self {
            db,
            config: Arc::new(config),
            toggles,
            compositor,
            content,
        }
    }
}
