//! Remote knowledge base served as JSON over HTTP.
//!
//! The endpoint receives the extracted message as the `query` parameter and
//! answers with a JSON array of `{user|question, answer}` objects. Matching
//! happens locally, so the endpoint may return its whole answer set.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{decode_records, KnowledgeBaseLookup, KnowledgeRecord, LookupError};

/// Default user agent sent to the knowledge base.
pub const USER_AGENT: &str = concat!("errorlens/", env!("CARGO_PKG_VERSION"));

/// Knowledge base reached over HTTP.
#[derive(Clone)]
pub struct HttpKnowledgeBase {
    client: Client,
    url: Url,
}

/// Builder for [`HttpKnowledgeBase`].
///
/// The endpoint URL is required and given to [`HttpKnowledgeBase::builder`];
/// everything else is optional.
pub struct HttpKnowledgeBaseBuilder {
    url: String,
    timeout: Duration,
    user_agent: Option<String>,
}

impl HttpKnowledgeBaseBuilder {
    /// Set the request timeout. A timed out request counts as a failed lookup.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = Some(ua.to_string());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns an error if the URL is not a valid http(s) URL or the
    /// underlying client cannot be created.
    pub fn build(self) -> Result<HttpKnowledgeBase, String> {
        let url = Url::parse(&self.url)
            .map_err(|e| format!("Invalid knowledge base URL '{}': {}", self.url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "Unsupported knowledge base URL scheme '{}' (expected http or https)",
                url.scheme()
            ));
        }

        let client = Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(HttpKnowledgeBase { client, url })
    }
}

impl HttpKnowledgeBase {
    /// Start building a client for the endpoint at `url`.
    pub fn builder(url: &str) -> HttpKnowledgeBaseBuilder {
        HttpKnowledgeBaseBuilder {
            url: url.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }

    /// Endpoint this client queries.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl KnowledgeBaseLookup for HttpKnowledgeBase {
    fn name(&self) -> &str {
        "http"
    }

    async fn query(&self, text: &str) -> Result<Vec<KnowledgeRecord>, LookupError> {
        debug!("Querying knowledge base at {} for: {}", self.url, text);

        let response = self
            .client
            .get(self.url.clone())
            .query(&[("query", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| LookupError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        decode_records(value)
    }
}
