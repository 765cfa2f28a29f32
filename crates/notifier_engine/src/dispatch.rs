use serde::Serialize;

use crate::types::{HttpSettings, SendError};

/// One outbound notification. The channel offers no idempotency guarantee;
/// cursor/snapshot advancement is the only dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub content: String,
    pub embed: Option<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub description: String,
    pub footer: Option<String>,
}

impl Notification {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embed: None,
        }
    }
}

#[async_trait::async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), SendError>;
}

/// Posts notifications as JSON to a chat webhook URL.
pub struct WebhookDispatcher {
    url: String,
    settings: HttpSettings,
}

#[derive(Serialize)]
struct WirePayload<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<WireEmbed<'a>>,
}

#[derive(Serialize)]
struct WireEmbed<'a> {
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<WireFooter<'a>>,
}

#[derive(Serialize)]
struct WireFooter<'a> {
    text: &'a str,
}

impl WebhookDispatcher {
    pub fn new(url: impl Into<String>, settings: HttpSettings) -> Self {
        Self {
            url: url.into(),
            settings,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, SendError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SendError::Network(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Dispatcher for WebhookDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), SendError> {
        let payload = WirePayload {
            content: &notification.content,
            embeds: notification
                .embed
                .iter()
                .map(|embed| WireEmbed {
                    description: &embed.description,
                    footer: embed.footer.as_deref().map(|text| WireFooter { text }),
                })
                .collect(),
        };

        let client = self.build_client()?;
        let response = client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| SendError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SendError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
