mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use notifier_core::{FeedFilter, FeedTemplates};
use notifier_engine::{
    run_feed, run_progress, FeedJob, FileStateStore, HtmlProgressSource, HttpSettings,
    HttpTimelineSource, ProgressJob, WebhookDispatcher,
};
use notifier_logging::{notify_error, notify_info, set_run_seq};

use crate::config::Config;

fn main() -> ExitCode {
    logging::initialize(logging::LogDestination::Both);

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("notifier.ron"));

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            notify_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> Result<()> {
    let config = config::load(config_path)?;

    // One polling cycle per invocation; the scheduler provides the cadence
    // and guarantees runs do not overlap.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not start async runtime")?;

    runtime.block_on(run_jobs(&config))
}

async fn run_jobs(config: &Config) -> Result<()> {
    let store = FileStateStore::new(&config.state_dir);
    let dispatcher = WebhookDispatcher::new(config.webhook_url.clone(), HttpSettings::default());

    let mut seq = 0u64;
    let mut failures = 0usize;

    for progress in &config.progress {
        seq += 1;
        set_run_seq(seq);

        let source = HtmlProgressSource::new(progress.url.clone(), HttpSettings::default());
        let job = ProgressJob {
            slot: progress.name.clone(),
            url: progress.url.clone(),
            message: progress.message.clone(),
        };
        match run_progress(&source, &store, &dispatcher, &job).await {
            Ok(outcome) => notify_info!(
                "[{}] run finished: {} items fetched, {} reported",
                progress.name,
                outcome.fetched,
                outcome.reported
            ),
            Err(err) => {
                notify_error!("[{}] run failed: {}", progress.name, err);
                failures += 1;
            }
        }
    }

    for feed in &config.feeds {
        seq += 1;
        set_run_seq(seq);

        let source = HttpTimelineSource::new(
            feed.api_base.clone(),
            feed.account.clone(),
            HttpSettings::default(),
        );
        let job = FeedJob {
            slot: feed.name.clone(),
            filter: FeedFilter::new(
                feed.account.clone(),
                feed.exclude_reposts_of.iter().cloned(),
            ),
            templates: FeedTemplates {
                display_name: feed
                    .display_name
                    .clone()
                    .unwrap_or_else(|| feed.account.clone()),
                post_message: feed.post_message.clone(),
                repost_message: feed.repost_message.clone(),
                permalink_base: feed.permalink_base.trim_end_matches('/').to_string(),
            },
        };
        match run_feed(&source, &store, &dispatcher, &job).await {
            Ok(outcome) => notify_info!(
                "[{}] run finished at cursor {}: {} dispatched, {} suppressed",
                feed.name,
                outcome.cursor,
                outcome.dispatched,
                outcome.suppressed
            ),
            Err(err) => {
                notify_error!("[{}] run failed: {}", feed.name, err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} job(s) failed; see log for details");
    }
    Ok(())
}
