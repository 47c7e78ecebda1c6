use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use np_core::{Error, FeedTransport, Result};
use reqwest::Client;
use serde_json::Value;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; NewsPulse/0.1)";

pub fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(5))
        .build()?)
}

/// How a transport wraps the feed document in its response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Raw,
    /// A JSON object carrying the document as a string under `field`.
    Json { field: String },
}

impl Envelope {
    pub fn unwrap_body(&self, body: String) -> Result<String> {
        match self {
            Envelope::Raw => Ok(body),
            Envelope::Json { field } => {
                let value: Value = serde_json::from_str(&body)?;
                value
                    .get(field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| Error::Feed(format!("JSON envelope has no `{}` string", field)))
            }
        }
    }
}

async fn get_body(client: &Client, name: &str, target: &str) -> Result<String> {
    let response = client.get(target).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Feed(format!("{} returned status {}", name, status)));
    }
    Ok(response.text().await?)
}

/// Fetches the feed URL itself.
pub struct DirectTransport {
    client: Client,
}

impl DirectTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedTransport for DirectTransport {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch(&self, feed_url: &str) -> Result<String> {
        get_body(&self.client, self.name(), feed_url).await
    }
}

/// Fetches through a relay. The template's `{encoded}` placeholder receives
/// the percent-encoded feed URL and `{raw}` the URL as is.
pub struct ProxyTransport {
    name: String,
    client: Client,
    template: String,
    envelope: Envelope,
}

impl ProxyTransport {
    pub fn new(name: impl Into<String>, client: Client, template: impl Into<String>, envelope: Envelope) -> Self {
        Self {
            name: name.into(),
            client,
            template: template.into(),
            envelope,
        }
    }

    pub fn target_url(&self, feed_url: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(feed_url.as_bytes()).collect();
        self.template.replace("{encoded}", &encoded).replace("{raw}", feed_url)
    }
}

#[async_trait]
impl FeedTransport for ProxyTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, feed_url: &str) -> Result<String> {
        let body = get_body(&self.client, &self.name, &self.target_url(feed_url)).await?;
        self.envelope.unwrap_body(body)
    }
}

/// Direct fetch first, then the public relays in the order they tend to work.
pub fn default_transports(client: Client) -> Vec<Arc<dyn FeedTransport>> {
    let relays = [
        (
            "allorigins",
            "https://api.allorigins.win/get?url={encoded}",
            Envelope::Json {
                field: "contents".to_string(),
            },
        ),
        ("codetabs", "https://api.codetabs.com/v1/proxy?quest={encoded}", Envelope::Raw),
        ("corsproxy", "https://corsproxy.io/?{encoded}", Envelope::Raw),
        ("thingproxy", "https://thingproxy.freeboard.io/fetch/{raw}", Envelope::Raw),
    ];

    let mut transports: Vec<Arc<dyn FeedTransport>> = vec![Arc::new(DirectTransport::new(client.clone()))];
    for (name, template, envelope) in relays {
        transports.push(Arc::new(ProxyTransport::new(name, client.clone(), template, envelope)));
    }
    transports
}
