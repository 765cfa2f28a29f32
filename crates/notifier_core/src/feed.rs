use std::collections::HashSet;

/// Snowflake id of a post: larger means strictly newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostId(u64);

impl PostId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to another post, carried by reposts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    pub id: PostId,
    pub author: String,
}

/// One timeline entry as produced by the feed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    pub repost_of: Option<PostRef>,
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Normal,
    Repost,
    Reply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// The repost's original author is on the exclusion list.
    ExcludedRepostAuthor,
    /// The reply is not a continuation of the account's own thread.
    ReplyToOther,
}

/// Outcome of running the filter policy over one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub classification: Classification,
    pub suppressed: Option<SuppressReason>,
}

/// Source-specific notification policy for a polled account.
///
/// Suppression decides whether a post is worth a notification; the cursor
/// advances past suppressed posts all the same, otherwise a persistently
/// excluded author would be re-inspected on every run forever.
#[derive(Debug, Clone)]
pub struct FeedFilter {
    account: String,
    excluded_repost_authors: HashSet<String>,
}

impl FeedFilter {
    pub fn new(account: impl Into<String>, exclusions: impl IntoIterator<Item = String>) -> Self {
        Self {
            account: account.into(),
            excluded_repost_authors: exclusions.into_iter().collect(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn evaluate(&self, post: &Post) -> Evaluation {
        let classification = self.classify(post);
        let suppressed = match classification {
            Classification::Repost => post
                .repost_of
                .as_ref()
                .filter(|original| self.excluded_repost_authors.contains(&original.author))
                .map(|_| SuppressReason::ExcludedRepostAuthor),
            // A reply classification already means "directed at someone else".
            Classification::Reply => Some(SuppressReason::ReplyToOther),
            Classification::Normal => None,
        };

        Evaluation {
            classification,
            suppressed,
        }
    }

    fn classify(&self, post: &Post) -> Classification {
        if post.repost_of.is_some() {
            return Classification::Repost;
        }
        match post.reply_to.as_deref() {
            Some(target) if target != self.account => Classification::Reply,
            _ => Classification::Normal,
        }
    }
}

/// Walk posts oldest-to-newest, the reverse of the newest-first fetch order,
/// so notifications go out in chronological order.
pub fn chronological(posts: &[Post]) -> impl Iterator<Item = &Post> {
    posts.iter().rev()
}
