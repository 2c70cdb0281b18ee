use crate::config::TransportConfig;
use reqwest::{redirect, Client, Method};
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to construct HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("concurrency permit pool closed")]
    Closed,
}

/// Request body payloads supported by [`Transport::request`].
#[derive(Debug, Clone)]
pub enum RequestBody {
    Raw(String),
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

/// Per-call options layered over the transport's defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Overrides the transport-wide redirect policy for this call.
    pub follow_redirects: Option<bool>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = Some(follow);
        self
    }
}

/// A fully read HTTP response. The body is buffered so plugins can inspect
/// it repeatedly without holding a connection open.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after any redirects.
    pub url: String,
    pub status: u16,
    /// Header names lowercased; repeated headers keep the last value.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

pub struct Transport {
    config: TransportConfig,
    /// Client honoring redirects; used when a call follows the default
    /// policy or explicitly opts in.
    redirecting: Client,
    /// Client that never follows redirects. reqwest fixes the redirect
    /// policy per client, so the per-call override needs both.
    direct: Client,
    permits: Semaphore,
}

impl Transport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let redirecting = build_client(&config, true)?;
        let direct = build_client(&config, false)?;
        let permits = Semaphore::new(config.max_concurrent_requests);
        Ok(Self {
            config,
            redirecting,
            direct,
            permits,
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Execute one HTTP request.
    ///
    /// Suspends until a concurrency permit is available, then attempts the
    /// request up to `retry_attempts + 1` times. Connection-level failures
    /// back off `retry_backoff_base * 2^attempt` between tries; HTTP error
    /// statuses are returned as ordinary responses. The inter-request delay
    /// runs after the final outcome, success or not, while the permit is
    /// still held.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        opts: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TransportError::Closed)?;

        let mut attempt: u32 = 0;
        let outcome = loop {
            match self.execute(method.clone(), url, &opts).await {
                Ok(response) => break Ok(response),
                Err(source) if !is_connection_error(&source) => {
                    break Err(TransportError::RequestFailed {
                        url: url.to_string(),
                        source,
                    });
                }
                Err(source) => {
                    if attempt >= self.config.retry_attempts {
                        warn!(
                            url,
                            attempts = attempt + 1,
                            "request failed, retries exhausted: {source}"
                        );
                        break Err(TransportError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: attempt + 1,
                            source,
                        });
                    }
                    let backoff = self.config.retry_backoff_base() * 2u32.pow(attempt);
                    debug!(
                        url,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        "request failed, retrying: {source}"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        };

        let delay = self.config.delay_between_requests();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        outcome
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        opts: &RequestOptions,
    ) -> Result<HttpResponse, reqwest::Error> {
        let follow = opts
            .follow_redirects
            .unwrap_or(self.config.follow_redirects);
        let client = if follow { &self.redirecting } else { &self.direct };

        let mut request = client.request(method.clone(), url);
        for (name, value) in &opts.headers {
            request = request.header(name, value);
        }
        if !opts.query.is_empty() {
            request = request.query(&opts.query);
        }
        if let Some(body) = &opts.body {
            request = match body {
                RequestBody::Raw(text) => request.body(text.clone()),
                RequestBody::Form(pairs) => request.form(pairs),
                RequestBody::Json(value) => request.json(value),
            };
        }

        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        debug!(
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "{method} {url}"
        );

        Ok(HttpResponse {
            url: final_url,
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.request(Method::GET, url, RequestOptions::new()).await
    }

    pub async fn get_with(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        self.request(Method::GET, url, opts).await
    }

    pub async fn post(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        self.request(Method::POST, url, opts).await
    }

    pub async fn put(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        self.request(Method::PUT, url, opts).await
    }

    pub async fn delete(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        self.request(Method::DELETE, url, opts).await
    }

    pub async fn head(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.request(Method::HEAD, url, RequestOptions::new()).await
    }

    pub async fn options(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        self.request(Method::OPTIONS, url, opts).await
    }

    /// Lightweight reachability probe: HEAD first, GET if HEAD errors out.
    /// Reachable means any response with a status below 500. Never errors.
    pub async fn probe_connection(&self, url: &str) -> bool {
        match self.head(url).await {
            Ok(response) => response.status < 500,
            Err(_) => match self.get(url).await {
                Ok(response) => response.status < 500,
                Err(_) => false,
            },
        }
    }
}

fn build_client(config: &TransportConfig, follow: bool) -> Result<Client, TransportError> {
    let policy = if follow {
        redirect::Policy::limited(10)
    } else {
        redirect::Policy::none()
    };
    Client::builder()
        .timeout(config.request_timeout())
        .user_agent(&config.user_agent)
        .danger_accept_invalid_certs(!config.verify_ssl)
        .redirect(policy)
        .build()
        .map_err(TransportError::ClientBuild)
}

/// HTTP error statuses never reach this point - reqwest reports them as
/// ordinary responses. Anything that failed during sending or while reading
/// the body is connection-level and worth retrying, except errors in the
/// request itself.
fn is_connection_error(err: &reqwest::Error) -> bool {
    !err.is_builder()
}
