use crate::cloudflare::members::{AccountMember, MemberDirectory};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Page size of the single member listing request
const MEMBERS_PER_PAGE: u32 = 50;

#[derive(Error, Debug, Clone)]
pub enum CloudflareError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("JSON parsing failed: {0}")]
    JsonError(String),

    #[error("No Cloudflare credentials found. Set CLOUDFLARE_API_TOKEN, or CLOUDFLARE_API_KEY together with CLOUDFLARE_EMAIL.")]
    MissingCredentials,

    #[error("Cloudflare rejected the credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Rate limit exceeded. Please wait before making additional requests to the Cloudflare API.")]
    RateLimited,

    #[error("Cloudflare API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for CloudflareError {
    fn from(error: reqwest::Error) -> Self {
        CloudflareError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for CloudflareError {
    fn from(error: serde_json::Error) -> Self {
        CloudflareError::JsonError(error.to_string())
    }
}

/// How requests authenticate against the API
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiToken(String),
    ApiKey { key: String, email: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiToken(_) => f.write_str("ApiToken(..)"),
            Credentials::ApiKey { email, .. } => write!(f, "ApiKey {{ email: {:?}, .. }}", email),
        }
    }
}

impl Credentials {
    /// Resolve credentials from the process environment
    pub fn from_env() -> Result<Self, CloudflareError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// An API token takes precedence over a global API key
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CloudflareError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(token) = non_empty("CLOUDFLARE_API_TOKEN") {
            return Ok(Credentials::ApiToken(token));
        }

        match (non_empty("CLOUDFLARE_API_KEY"), non_empty("CLOUDFLARE_EMAIL")) {
            (Some(key), Some(email)) => Ok(Credentials::ApiKey { key, email }),
            _ => Err(CloudflareError::MissingCredentials),
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::ApiToken(token) => request.bearer_auth(token),
            Credentials::ApiKey { key, email } => request
                .header("X-Auth-Key", key)
                .header("X-Auth-Email", email),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_count: Option<u64>,
}

/// Standard v4 response envelope
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

fn describe_errors(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no error details returned".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct CloudflareClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl CloudflareClient {
    pub fn new(credentials: Credentials) -> Result<Self, CloudflareError> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        credentials: Credentials,
        base_url: impl Into<String>,
    ) -> Result<Self, CloudflareError> {
        let client = Client::builder()
            .user_agent(concat!("er-cloudflare-account/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Build a client from `CLOUDFLARE_*` environment variables
    pub fn from_env() -> Result<Self, CloudflareError> {
        let credentials = Credentials::from_env()?;
        let base_url = std::env::var("CLOUDFLARE_BASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(credentials, base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the members of an account with a single request
    pub async fn list_account_members(
        &self,
        account_id: &str,
    ) -> Result<Vec<AccountMember>, CloudflareError> {
        let url = format!("{}/accounts/{}/members", self.base_url, account_id);
        debug!("Listing account members at URL: {}", url);

        let request = self
            .client
            .get(&url)
            .query(&[("per_page", MEMBERS_PER_PAGE)]);
        let response = self.credentials.apply(request).send().await?;
        let status = response.status();

        debug!("List members response status: {}", status);

        let response_text = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limit exceeded while listing members of {}", account_id);
            return Err(CloudflareError::RateLimited);
        }

        let envelope = serde_json::from_str::<ApiEnvelope<Vec<AccountMember>>>(&response_text);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = envelope
                .map(|e| describe_errors(&e.errors))
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown").to_string());
            error!("Cloudflare rejected credentials: {}", message);
            return Err(CloudflareError::Unauthorized {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            let message = match envelope {
                Ok(e) => describe_errors(&e.errors),
                Err(_) => response_text.chars().take(500).collect(),
            };
            error!("HTTP error {} listing members: {}", status, message);
            return Err(CloudflareError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = envelope.map_err(|e| {
            error!("Failed to parse members response: {}", e);
            CloudflareError::from(e)
        })?;

        if !envelope.success {
            let message = describe_errors(&envelope.errors);
            error!("Cloudflare reported failure listing members: {}", message);
            return Err(CloudflareError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let members = envelope.result.unwrap_or_default();

        if let Some(total) = envelope.result_info.and_then(|info| info.total_count) {
            if total > members.len() as u64 {
                warn!(
                    "Account {} has {} members but only {} were returned",
                    account_id,
                    total,
                    members.len()
                );
            }
        }

        info!(
            "Found {} live members for account {}",
            members.len(),
            account_id
        );
        Ok(members)
    }
}

#[async_trait]
impl MemberDirectory for CloudflareClient {
    type Member = AccountMember;

    async fn list_members(&self, account_id: &str) -> Result<Vec<AccountMember>, CloudflareError> {
        self.list_account_members(account_id).await
    }
}
