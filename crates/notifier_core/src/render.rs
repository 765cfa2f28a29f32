use std::fmt::Write;

use crate::feed::Post;
use crate::progress::ProgressChange;

/// Width of the rendered progress bar; one segment per 2.5 percent.
pub const BAR_SEGMENTS: usize = 40;
const BLOCK_SIZE: f64 = 2.5;

/// Render all changed bars into one composite message body.
///
/// Each entry is a bold title line annotated with `[New]` or
/// `[Changed] old% → new%`, followed by a fixed-width filled/unfilled bar
/// with the percentage right-aligned to three digits.
pub fn render_progress_message(changes: &[ProgressChange]) -> String {
    let mut body = String::new();

    for (i, change) in changes.iter().enumerate() {
        if i != 0 {
            body.push_str("\n\n");
        }

        let mut title = change.title.clone();
        if !change.link.is_empty() {
            title = format!("[{}]({})", change.title, change.link);
        }
        if change.is_new {
            title = format!("[New] {title}");
        } else {
            title = format!("[Changed] {title} ({}% → {}%)", change.old_value, change.value);
        }
        let _ = writeln!(body, "**{title}**");

        let filled = bar_fill(change.value);
        body.push('`');
        body.push_str(&"█".repeat(filled));
        body.push_str(&"░".repeat(BAR_SEGMENTS - filled));
        let _ = write!(body, " {:>3}%", change.value);
        body.push('`');
    }

    body
}

fn bar_fill(value: i64) -> usize {
    let filled = (value.max(0) as f64 / BLOCK_SIZE).floor() as usize;
    filled.min(BAR_SEGMENTS)
}

/// Per-account text configuration for feed notifications.
#[derive(Debug, Clone)]
pub struct FeedTemplates {
    /// Name shown in the default attribution lines.
    pub display_name: String,
    /// Overrides the default "<name> posted" lead-in when set.
    pub post_message: Option<String>,
    /// Overrides the default "<name> reposted" lead-in when set.
    pub repost_message: Option<String>,
    /// Base URL for permalinks, without a trailing slash.
    pub permalink_base: String,
}

/// Render the notification text for a single post.
///
/// Reposts link the original post and carry the repost's own permalink in
/// angle brackets so chat clients do not unfurl it twice.
pub fn render_post_message(post: &Post, templates: &FeedTemplates) -> String {
    let base = &templates.permalink_base;

    match &post.repost_of {
        Some(original) => {
            let lead = templates
                .repost_message
                .clone()
                .unwrap_or_else(|| format!("{} reposted", templates.display_name));
            format!(
                "{lead}\n{base}/{}/status/{} (<{base}/{}/status/{}>)",
                original.author, original.id, post.author, post.id,
            )
        }
        None => {
            let lead = templates
                .post_message
                .clone()
                .unwrap_or_else(|| format!("{} posted", templates.display_name));
            format!("{lead}\n{base}/{}/status/{}", post.author, post.id)
        }
    }
}
