use notifier_core::{FeedCursor, Post, PostId, PostRef};
use serde::Deserialize;
use url::Url;

use crate::types::{map_reqwest_error, HttpSettings, SourceError};

const PAGE_SIZE: usize = 80;
// 40 pages of 80 posts, matching the upstream timeline depth limit.
const MAX_PAGES: usize = 40;

/// Produces posts strictly newer than a cursor, newest first.
///
/// Termination on `id <= cursor` is the source's own stopping rule, not a
/// separate filter pass; callers receive an already-bounded sequence.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn newer_than(&self, cursor: FeedCursor) -> Result<Vec<Post>, SourceError>;
}

/// Pages a JSON timeline endpoint with `max_id` pagination.
pub struct HttpTimelineSource {
    base_url: String,
    account: String,
    settings: HttpSettings,
}

#[derive(Debug, Deserialize)]
struct TimelinePage {
    posts: Vec<WirePost>,
}

#[derive(Debug, Deserialize)]
struct WirePost {
    id: String,
    author: String,
    #[serde(default)]
    repost_of: Option<WirePostRef>,
    #[serde(default)]
    reply_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WirePostRef {
    id: String,
    author: String,
}

impl HttpTimelineSource {
    pub fn new(
        base_url: impl Into<String>,
        account: impl Into<String>,
        settings: HttpSettings,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            account: account.into(),
            settings,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, SourceError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SourceError::Network {
                url: self.base_url.clone(),
                message: err.to_string(),
            })
    }

    fn page_url(&self, max_id: Option<u64>) -> Result<Url, SourceError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| SourceError::Parse(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Parse("timeline base url cannot be a base".into()))?
            .pop_if_empty()
            .extend(["api", "timeline", &self.account]);
        url.query_pairs_mut()
            .append_pair("limit", &PAGE_SIZE.to_string());
        if let Some(max_id) = max_id {
            url.query_pairs_mut()
                .append_pair("max_id", &max_id.to_string());
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl FeedSource for HttpTimelineSource {
    async fn newer_than(&self, cursor: FeedCursor) -> Result<Vec<Post>, SourceError> {
        let client = self.build_client()?;
        let mut result = Vec::new();
        let mut max_id: Option<u64> = None;

        for _ in 0..MAX_PAGES {
            let url = self.page_url(max_id)?;
            let response = client
                .get(url.clone())
                .send()
                .await
                .map_err(|err| map_reqwest_error(url.as_str(), err))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let page: TimelinePage = response
                .json()
                .await
                .map_err(|err| SourceError::Parse(err.to_string()))?;
            if page.posts.is_empty() {
                break;
            }

            let mut lowest = u64::MAX;
            for wire in page.posts {
                let post = convert_post(wire)?;
                if cursor.includes(post.id) {
                    return Ok(result);
                }
                lowest = lowest.min(post.id.value());
                result.push(post);
            }

            if lowest == 0 {
                break;
            }
            max_id = Some(lowest - 1);
        }

        Ok(result)
    }
}

fn convert_post(wire: WirePost) -> Result<Post, SourceError> {
    let repost_of = wire
        .repost_of
        .map(|original| {
            Ok(PostRef {
                id: parse_id(&original.id)?,
                author: original.author,
            })
        })
        .transpose()?;

    Ok(Post {
        id: parse_id(&wire.id)?,
        author: wire.author,
        repost_of,
        reply_to: wire.reply_to,
    })
}

fn parse_id(raw: &str) -> Result<PostId, SourceError> {
    raw.parse::<u64>()
        .map(PostId::new)
        .map_err(|_| SourceError::InvalidId {
            raw: raw.to_string(),
        })
}
