//! RON configuration for the notifier binary.
//!
//! The engine only ever sees already-validated values; everything here is
//! checked before any run starts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding one state file per job.
    pub state_dir: PathBuf,
    /// Chat webhook all notifications are posted to.
    pub webhook_url: String,
    #[serde(default)]
    pub progress: Vec<ProgressConfig>,
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// Job name, also the state-store slot.
    pub name: String,
    pub url: String,
    /// Lead-in text of the composite notification.
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Job name, also the state-store slot.
    pub name: String,
    pub account: String,
    /// Base URL of the timeline API.
    pub api_base: String,
    /// Base URL for permalinks in notifications.
    pub permalink_base: String,
    /// Shown in attribution lines; falls back to the account handle.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub post_message: Option<String>,
    #[serde(default)]
    pub repost_message: Option<String>,
    #[serde(default)]
    pub exclude_reposts_of: Vec<String>,
}

pub fn load(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("could not read config {path:?}"))?;
    let config: Config =
        ron::from_str(&content).with_context(|| format!("could not parse config {path:?}"))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.progress.is_empty() && config.feeds.is_empty() {
        bail!("config defines no jobs");
    }
    Url::parse(&config.webhook_url).context("webhook_url is not a valid URL")?;

    let mut names = HashSet::new();
    for progress in &config.progress {
        require_unique(&mut names, &progress.name)?;
        Url::parse(&progress.url)
            .with_context(|| format!("progress job '{}': url is not valid", progress.name))?;
        if progress.message.is_empty() {
            bail!("progress job '{}': message must not be empty", progress.name);
        }
    }
    for feed in &config.feeds {
        require_unique(&mut names, &feed.name)?;
        if feed.account.is_empty() {
            bail!("feed job '{}': account must not be empty", feed.name);
        }
        Url::parse(&feed.api_base)
            .with_context(|| format!("feed job '{}': api_base is not valid", feed.name))?;
        Url::parse(&feed.permalink_base)
            .with_context(|| format!("feed job '{}': permalink_base is not valid", feed.name))?;
    }
    Ok(())
}

fn require_unique(names: &mut HashSet<String>, name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("job names must not be empty");
    }
    if !names.insert(name.to_string()) {
        bail!("duplicate job name '{name}'; each job needs its own state slot");
    }
    Ok(())
}
