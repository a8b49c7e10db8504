//! HTTP client for the IO App API.
//!
//! Thin authenticated boundary: every method performs a single request and
//! maps the response status to the crate error taxonomy. Retry and pacing
//! are deliberately not handled here; the reconciliation engine owns that
//! policy so it can also govern the delay between calls.

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{BotError, Result};
use crate::io::models::{
    DefaultAddresses, GetMessageResponse, MessageContent, SendMessageResponse,
    SubscriptionsFeed, UserProfile,
};

pub const DEFAULT_BASE_URL: &str = "https://api.io.italia.it/api/v1";

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for a single IO service.
///
/// On registration of a service two API tokens are issued; either works
/// here. The token travels in the `Ocp-Apim-Subscription-Key` header on
/// every request.
#[derive(Debug, Clone)]
pub struct IoServiceClient {
    base_url: String,
    http: reqwest::Client,
}

impl IoServiceClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(token)
            .map_err(|_| BotError::Config("API token contains invalid characters".to_string()))?;
        key.set_sensitive(true);
        headers.insert(SUBSCRIPTION_KEY_HEADER, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("io-registered-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the profile of the user with the given fiscal code.
    ///
    /// A 404 means the user is not registered with IO at all; callers treat
    /// the resulting [`BotError::NotFound`] as a classification signal, not
    /// a failure.
    pub async fn get_profile(&self, fiscal_code: &str) -> Result<UserProfile> {
        let url = format!("{}/profiles/{}", self.base_url, fiscal_code);
        self.get_json(&url, &format!("profile of {fiscal_code}")).await
    }

    /// Get the hashed fiscal codes which subscribed to or unsubscribed from
    /// the service on the given date.
    ///
    /// Requires special authorization on the service.
    pub async fn get_subscriptions_on_day(&self, day: NaiveDate) -> Result<SubscriptionsFeed> {
        let url = format!(
            "{}/subscriptions-feed/{}",
            self.base_url,
            day.format("%Y-%m-%d")
        );
        self.get_json(&url, &format!("subscriptions feed for {day}")).await
    }

    /// Send a message to the user with the given fiscal code.
    pub async fn send_message(
        &self,
        fiscal_code: &str,
        content: &MessageContent,
        time_to_live: u64,
        default_addresses: Option<&DefaultAddresses>,
    ) -> Result<SendMessageResponse> {
        let url = format!("{}/messages/{}", self.base_url, fiscal_code);
        let body = serde_json::json!({
            "time_to_live": time_to_live,
            "content": content,
            "default_addresses": default_addresses,
        });
        self.post_json(&url, &body, &format!("send message to {fiscal_code}")).await
    }

    /// Get a previously sent message addressed to the given fiscal code.
    pub async fn get_message(
        &self,
        fiscal_code: &str,
        message_id: &str,
    ) -> Result<GetMessageResponse> {
        let url = format!("{}/messages/{}/{}", self.base_url, fiscal_code, message_id);
        self.get_json(&url, &format!("message {message_id} for {fiscal_code}")).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, context: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        self.handle_response(response, context).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        context: &str,
    ) -> Result<T> {
        debug!("POST {}", url);
        let response = self.http.post(url).json(body).send().await?;
        self.handle_response(response, context).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| BotError::MalformedResponse {
                context: context.to_string(),
                detail: e.to_string(),
            });
        }

        match status {
            StatusCode::NOT_FOUND => Err(BotError::NotFound(context.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(BotError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BotError::Unauthorized {
                context: context.to_string(),
            }),
            _ => Err(BotError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_string(),
            }),
        }
    }
}
