use std::fmt;
use std::str::FromStr;

use crate::feed::PostId;

/// Last fully-processed position in a feed, persisted as a decimal string.
///
/// A cursor only ever moves forward; a failed run never rewinds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FeedCursor(u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cursor '{raw}' is not a valid snowflake id")]
pub struct CursorParseError {
    pub raw: String,
}

impl FeedCursor {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Move the cursor past `id`. A smaller or equal id is a no-op.
    pub fn advance_to(&mut self, id: PostId) {
        if id.value() > self.0 {
            self.0 = id.value();
        }
    }

    /// Whether `id` has already been processed under this cursor.
    pub fn includes(self, id: PostId) -> bool {
        id.value() <= self.0
    }
}

impl fmt::Display for FeedCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FeedCursor {
    type Err = CursorParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<u64>()
            .map(FeedCursor)
            .map_err(|_| CursorParseError {
                raw: raw.to_string(),
            })
    }
}

impl From<PostId> for FeedCursor {
    fn from(id: PostId) -> Self {
        Self(id.value())
    }
}
