//! Notifier core: pure change-detection logic and message rendering.
mod cursor;
mod feed;
mod progress;
mod render;

pub use cursor::{CursorParseError, FeedCursor};
pub use feed::{
    chronological, Classification, Evaluation, FeedFilter, Post, PostId, PostRef, SuppressReason,
};
pub use progress::{diff_progress, ProgressChange, ProgressItem};
pub use render::{render_post_message, render_progress_message, FeedTemplates, BAR_SEGMENTS};
