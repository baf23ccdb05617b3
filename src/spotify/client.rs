use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config,
    management::{TokenError, TokenManager},
    warning,
};

/// Attempts per GET request, including the first one.
pub const MAX_GET_ATTEMPTS: u32 = 3;

/// Longest `Retry-After` the client is willing to wait for.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Base delay before retrying a 502/503, multiplied by the attempt number.
pub const GATEWAY_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with {status}")]
    Status {
        endpoint: String,
        status: StatusCode,
    },
    #[error("rate limited on {endpoint}, retry after {retry_after}s")]
    RateLimited { endpoint: String, retry_after: u64 },
    #[error("no valid access token, run sporlfeed auth: {0}")]
    Token(#[from] TokenError),
}

/// Authorized client for the Spotify Web API.
///
/// The token manager sits behind an async mutex so concurrent requests share
/// a single refresh when the token expires.
pub struct WebApiClient {
    client: Client,
    base_url: String,
    tokens: Mutex<TokenManager>,
    gateway_backoff: Duration,
}

impl WebApiClient {
    pub fn new(base_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
            gateway_backoff: GATEWAY_BACKOFF,
        }
    }

    pub fn with_gateway_backoff(mut self, backoff: Duration) -> Self {
        self.gateway_backoff = backoff;
        self
    }

    /// Creates a client from the cached token and the configured API URL.
    pub async fn from_cache() -> Result<Self, TokenError> {
        let tokens = TokenManager::load().await?;
        Ok(Self::new(config::spotify_apiurl(), tokens))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn access_token(&self) -> Result<String, ApiError> {
        let mut tokens = self.tokens.lock().await;
        Ok(tokens.get_valid_token().await?)
    }

    /// GETs `path` and decodes the JSON body.
    ///
    /// GETs are idempotent, so transient failures are retried up to
    /// [`MAX_GET_ATTEMPTS`] times:
    /// - 502/503 with a linear backoff
    /// - 429 after the `Retry-After` delay, unless it exceeds
    ///   [`MAX_RETRY_AFTER_SECS`]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut attempt = 1;

        loop {
            let token = self.access_token().await?;
            let request = self.client.get(&url).query(query).bearer_auth(token);
            let response = send(request, path).await?;
            let status = response.status();

            if status.is_success() {
                return response.json::<T>().await.map_err(|source| ApiError::Network {
                    endpoint: path.to_string(),
                    source,
                });
            }

            if attempt >= MAX_GET_ATTEMPTS {
                return Err(status_error(path, &response));
            }

            match status {
                StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
                    sleep(self.gateway_backoff * attempt).await;
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = retry_after_secs(&response);
                    if retry_after > MAX_RETRY_AFTER_SECS {
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds on {}.",
                            retry_after,
                            path
                        );
                        return Err(status_error(path, &response));
                    }
                    sleep(Duration::from_secs(retry_after)).await;
                }
                _ => return Err(status_error(path, &response)),
            }

            attempt += 1;
        }
    }

    /// POSTs a JSON body to `path` and decodes the JSON response. Not retried.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.access_token().await?;
        let request = self.client.post(self.url(path)).bearer_auth(token).json(body);
        let response = send(request, path).await?;

        if !response.status().is_success() {
            return Err(status_error(path, &response));
        }

        response.json::<T>().await.map_err(|source| ApiError::Network {
            endpoint: path.to_string(),
            source,
        })
    }
}

async fn send(request: RequestBuilder, path: &str) -> Result<reqwest::Response, ApiError> {
    request.send().await.map_err(|source| ApiError::Network {
        endpoint: path.to_string(),
        source,
    })
}

fn status_error(path: &str, response: &reqwest::Response) -> ApiError {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return ApiError::RateLimited {
            endpoint: path.to_string(),
            retry_after: retry_after_secs(response),
        };
    }

    ApiError::Status {
        endpoint: path.to_string(),
        status: response.status(),
    }
}

fn retry_after_secs(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
