pub mod compositor;
pub mod content;
pub mod history;
pub mod toggle;

pub use compositor::ViewCompositor;
pub use content::ContentService;
pub use history::WatchHistoryTracker;
pub use toggle::ToggleService;
