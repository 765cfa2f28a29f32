//! Notifier engine: external collaborators and run orchestration.
mod dispatch;
mod feed_source;
mod progress_source;
mod run;
mod store;
mod types;

pub use dispatch::{Dispatcher, Embed, Notification, WebhookDispatcher};
pub use feed_source::{FeedSource, HttpTimelineSource};
pub use progress_source::{parse_progress_page, HtmlProgressSource, ProgressSource};
pub use run::{
    run_feed, run_progress, FeedJob, FeedOutcome, ProgressJob, ProgressOutcome, RunError,
};
pub use store::{FileStateStore, StateStore, StoreError};
pub use types::{HttpSettings, SendError, SourceError};
