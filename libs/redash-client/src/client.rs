// This file is part of the terraform-provider-redash project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{RedashError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
const PAGE_SIZE: usize = 250;

/// Configuration of a [`Client`]
#[derive(Debug)]
pub struct Config {
    /// Base URL of the Redash server, eg: `https://redash.example.com`
    pub redash_uri: String,
    /// User or admin API key
    pub api_key: SecretString,
    /// Timeout of a single HTTP request
    pub timeout: Duration,
    /// Number of retries on rate limiting and gateway errors
    pub max_retries: usize,
    /// Delay before the first retry, doubled on every further retry
    pub retry_backoff: Duration,
}

impl Config {
    pub fn new<U: Into<String>, K: Into<String>>(redash_uri: U, api_key: K) -> Self {
        let api_key: String = api_key.into();
        Self {
            redash_uri: redash_uri.into(),
            api_key: SecretString::new(api_key.into()),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Override the retry policy
    pub fn with_retries(mut self, max_retries: usize, retry_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = retry_backoff;
        self
    }
}

/// Page of a paginated listing
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub page: usize,
    pub page_size: usize,
    pub results: Vec<T>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Redash REST API client
///
/// Cloning is cheap: the HTTP connection pool and the key are shared.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: Arc<SecretString>,
    max_retries: usize,
    retry_backoff: Duration,
}

impl Client {
    /// Build a client, checking the URI and the key
    pub fn new(config: Config) -> Result<Self> {
        let parsed = Url::parse(&config.redash_uri).map_err(|err| RedashError::InvalidUrl {
            url: config.redash_uri.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RedashError::InvalidUrl {
                url: config.redash_uri,
                reason: "scheme must be http or https".to_owned(),
            });
        }
        if config.api_key.expose_secret().is_empty() {
            return Err(RedashError::InvalidConfig("API key is empty".to_owned()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("redash-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.redash_uri.trim_end_matches('/').to_owned(),
            api_key: Arc::new(config.api_key),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<String> {
        let url = self.url(path);
        let mut attempt = 0;
        loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(
                    AUTHORIZATION,
                    format!("Key {}", self.api_key.expose_secret()),
                );
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(%method, %url, attempt, "Sending Redash request");
            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }

            let status = status.as_u16();
            if RedashError::is_retryable_status(status) {
                if attempt < self.max_retries {
                    let backoff = self.retry_backoff * 2u32.pow(attempt as u32);
                    warn!(
                        status,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        "Transient Redash error, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    continue;
                }
                return Err(RedashError::MaxRetriesExceeded(attempt + 1));
            }

            let body = response.text().await.unwrap_or_default();
            debug!(status, %url, body = body.as_str(), "Redash request failed");
            if status == 404 {
                return Err(RedashError::NotFound(url));
            }
            return Err(RedashError::Api {
                status,
                url,
                message: error_message(&body),
            });
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let text = self.send(Method::GET, path, query, None).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch every page of a paginated listing
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page_number = 1;
        loop {
            let mut page_query = query.to_vec();
            page_query.push(("page", page_number.to_string()));
            page_query.push(("page_size", PAGE_SIZE.to_string()));

            let page: Page<T> = self.get_with_query(path, &page_query).await?;
            let fetched = page.results.len();
            items.extend(page.results);

            if fetched == 0 || items.len() >= page.count {
                return Ok(items);
            }
            page_number += 1;
        }
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let text = self.send(Method::POST, path, &[], Some(&body)).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// POST without caring about the response body
    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, &[], Some(&body)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error) => error.message,
        Err(_) if body.trim().is_empty() => "empty response".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}
