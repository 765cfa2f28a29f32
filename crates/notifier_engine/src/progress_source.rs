use ego_tree::NodeRef;
use notifier_core::ProgressItem;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::types::{map_reqwest_error, HttpSettings, SourceError};

const SAMPLE_LIMIT: usize = 200;

/// Produces the current ordered set of progress bars.
#[async_trait::async_trait]
pub trait ProgressSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ProgressItem>, SourceError>;
}

/// Fetches the configured page and scrapes its progress-bar widgets.
pub struct HtmlProgressSource {
    url: String,
    settings: HttpSettings,
}

impl HtmlProgressSource {
    pub fn new(url: impl Into<String>, settings: HttpSettings) -> Self {
        Self {
            url: url.into(),
            settings,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, SourceError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SourceError::Network {
                url: self.url.clone(),
                message: err.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl ProgressSource for HtmlProgressSource {
    async fn fetch(&self) -> Result<Vec<ProgressItem>, SourceError> {
        let client = self.build_client()?;
        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| map_reqwest_error(&self.url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| map_reqwest_error(&self.url, err))?;

        parse_progress_page(&body)
    }
}

/// Scrape `.vc_progress_bar` widgets: each `.vc_label` carries the title and
/// an optional link, the sibling `.vc_single_bar .vc_bar` carries the value.
///
/// Zero bars is a hard error: an empty page is indistinguishable from a
/// markup change that broke the selectors.
pub fn parse_progress_page(html: &str) -> Result<Vec<ProgressItem>, SourceError> {
    let doc = Html::parse_document(html);
    let label_sel = selector(".vc_progress_bar .vc_label")?;
    let link_sel = selector("a")?;
    let bar_sel = selector(".vc_bar")?;

    let mut items = Vec::new();
    for label in doc.select(&label_sel) {
        let title = label_title(label);
        let link = label
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default()
            .to_string();
        let value = bar_value(label, &bar_sel);
        items.push(ProgressItem { title, link, value });
    }

    if items.is_empty() {
        return Err(SourceError::EmptySource {
            sample: truncate_sample(html),
        });
    }

    Ok(items)
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|err| SourceError::Parse(err.to_string()))
}

/// Label text excluding the percentage `<span>` the widget nests inside it.
fn label_title(label: ElementRef) -> String {
    let mut title = String::new();
    for child in label.children() {
        collect_non_span_text(child, &mut title);
    }
    title.trim().to_string()
}

fn collect_non_span_text(node: NodeRef<Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) if element.name() != "span" => {
            for child in node.children() {
                collect_non_span_text(child, out);
            }
        }
        _ => {}
    }
}

/// Value of the first following `.vc_single_bar` sibling, 0 when absent or
/// unparseable. The scan stops at the next label so bars never bleed across
/// entries.
fn bar_value(label: ElementRef, bar_sel: &Selector) -> i64 {
    for sibling in label.next_siblings() {
        let Some(element) = ElementRef::wrap(sibling) else {
            continue;
        };
        if element.value().classes().any(|class| class == "vc_label") {
            break;
        }
        if element.value().classes().any(|class| class == "vc_single_bar") {
            return element
                .select(bar_sel)
                .next()
                .and_then(|bar| bar.value().attr("data-percentage-value"))
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .unwrap_or(0);
        }
    }
    0
}

fn truncate_sample(html: &str) -> String {
    let mut end = SAMPLE_LIMIT.min(html.len());
    while end > 0 && !html.is_char_boundary(end) {
        end -= 1;
    }
    html[..end].to_string()
}
