use notifier_core::{
    chronological, diff_progress, render_post_message, render_progress_message, FeedCursor,
    FeedFilter, FeedTemplates, Post,
};
use notifier_logging::{notify_error, notify_info};

use crate::dispatch::{Dispatcher, Embed, Notification};
use crate::feed_source::FeedSource;
use crate::progress_source::ProgressSource;
use crate::store::{StateStore, StoreError};
use crate::types::{SendError, SourceError};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] SourceError),
    #[error("no starting cursor for slot '{slot}'; seed the state file with the last processed id")]
    InvalidCursor { slot: String },
    #[error("state error: {0}")]
    State(#[source] StoreError),
    #[error("dispatch failed: {0}")]
    Send(#[from] SendError),
    #[error("failed to persist state: {0}")]
    Persist(#[source] StoreError),
}

/// Settings for one progress polling cycle.
pub struct ProgressJob {
    /// State-store slot name.
    pub slot: String,
    /// Page the items came from, referenced in the message footer.
    pub url: String,
    /// Lead-in text of the composite notification.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressOutcome {
    pub fetched: usize,
    pub reported: usize,
}

/// One progress polling cycle: fetch, diff against the stored snapshot, send
/// a single composite message, persist the new snapshot.
///
/// The composite either fully sends or not; any failure before the persist
/// step leaves the stored snapshot untouched, so the next run recomputes the
/// same diff (at-least-once redelivery of the whole batch).
pub async fn run_progress(
    source: &dyn ProgressSource,
    store: &dyn StateStore,
    dispatcher: &dyn Dispatcher,
    job: &ProgressJob,
) -> Result<ProgressOutcome, RunError> {
    notify_info!("[{}] checking for progress updates", job.slot);

    let current = source.fetch().await?;
    let previous = store.load_progress(&job.slot).map_err(RunError::State)?;

    let changes = diff_progress(&previous, &current);
    if changes.is_empty() {
        notify_info!("[{}] no progress changes to report", job.slot);
        return Ok(ProgressOutcome {
            fetched: current.len(),
            reported: 0,
        });
    }

    notify_info!(
        "[{}] reporting {} changed progress bars",
        job.slot,
        changes.len()
    );
    let notification = Notification {
        content: job.message.clone(),
        embed: Some(Embed {
            description: render_progress_message(&changes),
            footer: Some(format!("See {} for more", job.url)),
        }),
    };
    dispatcher.send(&notification).await?;

    store
        .save_progress(&job.slot, &current)
        .map_err(RunError::Persist)?;

    Ok(ProgressOutcome {
        fetched: current.len(),
        reported: changes.len(),
    })
}

/// Settings for one feed polling cycle.
pub struct FeedJob {
    /// State-store slot name.
    pub slot: String,
    pub filter: FeedFilter,
    pub templates: FeedTemplates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedOutcome {
    pub cursor: FeedCursor,
    pub dispatched: usize,
    pub suppressed: usize,
}

/// Best-effort walk result: the cursor is meaningful even when a send failed.
struct Walk {
    cursor: FeedCursor,
    dispatched: usize,
    suppressed: usize,
    failure: Option<SendError>,
}

/// One feed polling cycle: load the cursor, fetch newer posts, dispatch them
/// in chronological order, persist the advanced cursor.
///
/// Every processed post, sent or suppressed, advances the running cursor.
/// A send failure terminates the walk before advancing past the failed post,
/// and the cursor computed up to that point is still persisted, so the next
/// run resumes at the failed post without resending earlier ones.
pub async fn run_feed(
    source: &dyn FeedSource,
    store: &dyn StateStore,
    dispatcher: &dyn Dispatcher,
    job: &FeedJob,
) -> Result<FeedOutcome, RunError> {
    notify_info!("[{}] checking for new posts", job.slot);

    let starting = store
        .load_cursor(&job.slot)
        .map_err(RunError::State)?
        .ok_or_else(|| RunError::InvalidCursor {
            slot: job.slot.clone(),
        })?;

    let posts = source.newer_than(starting).await?;
    if posts.is_empty() {
        notify_info!("[{}] no posts to report", job.slot);
        return Ok(FeedOutcome {
            cursor: starting,
            dispatched: 0,
            suppressed: 0,
        });
    }
    notify_info!("[{}] processing {} posts", job.slot, posts.len());

    let walk = walk_and_dispatch(dispatcher, job, starting, &posts).await;

    if walk.cursor > starting {
        if let Err(err) = store.save_cursor(&job.slot, walk.cursor) {
            if let Some(send_err) = &walk.failure {
                notify_error!("[{}] dispatch failed before persist error: {}", job.slot, send_err);
            }
            return Err(RunError::Persist(err));
        }
    }

    match walk.failure {
        Some(err) => Err(RunError::Send(err)),
        None => Ok(FeedOutcome {
            cursor: walk.cursor,
            dispatched: walk.dispatched,
            suppressed: walk.suppressed,
        }),
    }
}

async fn walk_and_dispatch(
    dispatcher: &dyn Dispatcher,
    job: &FeedJob,
    starting: FeedCursor,
    posts: &[Post],
) -> Walk {
    let mut cursor = starting;
    let mut dispatched = 0;
    let mut suppressed = 0;

    for post in chronological(posts) {
        let evaluation = job.filter.evaluate(post);
        if let Some(reason) = evaluation.suppressed {
            notify_info!(
                "[{}] suppressing {:?} post {} from '{}': {:?}",
                job.slot,
                evaluation.classification,
                post.id,
                post.author,
                reason
            );
            cursor.advance_to(post.id);
            suppressed += 1;
            continue;
        }

        let text = render_post_message(post, &job.templates);
        if let Err(err) = dispatcher.send(&Notification::text(text)).await {
            // The failed post stays ahead of the cursor.
            return Walk {
                cursor,
                dispatched,
                suppressed,
                failure: Some(err),
            };
        }
        cursor.advance_to(post.id);
        dispatched += 1;
    }

    Walk {
        cursor,
        dispatched,
        suppressed,
        failure: None,
    }
}
