// Search client: one HTTP request per search against the flight-offers backend.
// The rest of the pipeline talks to the FlightSearchApi trait, so tests can
// swap the transport for a scripted one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{error, info};

use crate::criteria::SearchCriteria;
use crate::offers::OfferEnvelope;

pub const DEFAULT_BASE_URL: &str = "https://flightfinder-backend.vercel.app/api/flights";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

// Cap on upstream error text carried into messages and logs
const ERROR_BODY_LIMIT: usize = 200;

// Error types for a single search request. Exactly one request is made per
// search; there is no retry layer, so each of these surfaces directly.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

// Client statistics, updated atomically across concurrent searches
#[derive(Debug, Default)]
pub struct ClientStats {
    pub requests_sent: AtomicUsize,
    pub requests_succeeded: AtomicUsize,
    pub requests_failed: AtomicUsize,
    pub requests_timed_out: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct ClientStatsReport {
    pub requests_sent: usize,
    pub requests_succeeded: usize,
    pub requests_failed: usize,
    pub requests_timed_out: usize,
}

// Search API trait
#[async_trait]
pub trait FlightSearchApi: Send + Sync + 'static {
    // Run one search: a single request, decoded into the response envelope
    async fn search(&self, criteria: SearchCriteria) -> Result<OfferEnvelope, RequestError>;
}

// Shared handles let one client serve several tasks
#[async_trait]
impl<T: FlightSearchApi> FlightSearchApi for Arc<T> {
    async fn search(&self, criteria: SearchCriteria) -> Result<OfferEnvelope, RequestError> {
        self.as_ref().search(criteria).await
    }
}

// reqwest-backed search client
pub struct HttpSearchClient {
    http: reqwest::Client,
    config: ClientConfig,
    stats: ClientStats,
}

impl HttpSearchClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.base_url.is_empty() {
            return Err(ClientError::ConfigError(
                "base_url must not be empty".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            http,
            config,
            stats: ClientStats::default(),
        })
    }

    pub fn with_defaults() -> Result<Self, ClientError> {
        Self::new(ClientConfig::default())
    }

    // Full request URL for the given criteria, with the fixed query order
    pub fn request_url(&self, criteria: &SearchCriteria) -> Result<Url, RequestError> {
        Url::parse_with_params(&self.config.base_url, criteria.to_query())
            .map_err(|e| RequestError::InvalidEndpoint(e.to_string()))
    }

    pub fn stats(&self) -> ClientStatsReport {
        ClientStatsReport {
            requests_sent: self.stats.requests_sent.load(Ordering::SeqCst),
            requests_succeeded: self.stats.requests_succeeded.load(Ordering::SeqCst),
            requests_failed: self.stats.requests_failed.load(Ordering::SeqCst),
            requests_timed_out: self.stats.requests_timed_out.load(Ordering::SeqCst),
        }
    }

    async fn execute(&self, url: Url) -> Result<OfferEnvelope, RequestError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        // Read the body before the status check so upstream error payloads
        // make it into the message
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(RequestError::ApiResponseError {
                status_code: status.as_u16(),
                message: status_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(|e| RequestError::DecodeError(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> RequestError {
        if err.is_timeout() {
            RequestError::Timeout(self.config.timeout_ms)
        } else {
            RequestError::NetworkError(err.to_string())
        }
    }
}

#[async_trait]
impl FlightSearchApi for HttpSearchClient {
    async fn search(&self, criteria: SearchCriteria) -> Result<OfferEnvelope, RequestError> {
        let url = self.request_url(&criteria)?;
        self.stats.requests_sent.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        info!(
            origin = %criteria.origin,
            destination = %criteria.destination,
            date = %criteria.departure_date,
            adults = criteria.adults,
            "Sending flight search"
        );

        let outcome = self.execute(url).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(envelope) => {
                self.stats.requests_succeeded.fetch_add(1, Ordering::SeqCst);
                info!(
                    elapsed_ms,
                    success = envelope.success,
                    offers = envelope.offer_count(),
                    "Flight search completed"
                );
            }
            Err(err) => {
                self.stats.requests_failed.fetch_add(1, Ordering::SeqCst);
                if matches!(err, RequestError::Timeout(_)) {
                    self.stats.requests_timed_out.fetch_add(1, Ordering::SeqCst);
                }
                error!(elapsed_ms, %err, "Flight search failed");
            }
        }
        outcome
    }
}

// Message for a non-2xx response: the trimmed body when there is one, the
// status reason otherwise. Long bodies are cut at a char boundary.
fn status_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Unexpected status")
            .to_string();
    }
    if trimmed.len() <= ERROR_BODY_LIMIT {
        return trimmed.to_string();
    }
    let mut cut = ERROR_BODY_LIMIT;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &trimmed[..cut])
}

// Scripted stand-in for the backend, for pipeline and state tests
#[cfg(test)]
pub mod mock_api {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Mutex;

    pub struct MockFlightApi {
        envelope: Mutex<Option<OfferEnvelope>>,
        fail_next_requests: AtomicUsize,
        delay_ms: AtomicUsize,
        request_count: AtomicUsize,
        last_criteria: Mutex<Option<SearchCriteria>>,
    }

    impl MockFlightApi {
        pub fn new() -> Self {
            Self {
                envelope: Mutex::new(None),
                fail_next_requests: AtomicUsize::new(0),
                delay_ms: AtomicUsize::new(0),
                request_count: AtomicUsize::new(0),
                last_criteria: Mutex::new(None),
            }
        }

        pub async fn respond_with(&self, envelope: OfferEnvelope) {
            *self.envelope.lock().await = Some(envelope);
        }

        pub fn fail_next_requests(&self, count: usize) {
            self.fail_next_requests.store(count, Ordering::SeqCst);
        }

        pub fn set_delay(&self, delay_ms: usize) {
            self.delay_ms.store(delay_ms, Ordering::SeqCst);
        }

        pub fn request_count(&self) -> usize {
            self.request_count.load(Ordering::SeqCst)
        }

        pub async fn last_criteria(&self) -> Option<SearchCriteria> {
            self.last_criteria.lock().await.clone()
        }
    }

    #[async_trait]
    impl FlightSearchApi for MockFlightApi {
        async fn search(&self, criteria: SearchCriteria) -> Result<OfferEnvelope, RequestError> {
            self.request_count.fetch_add(1, Ordering::SeqCst);
            *self.last_criteria.lock().await = Some(criteria);

            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay as u64)).await;
            }

            let fail_count = self.fail_next_requests.load(Ordering::SeqCst);
            if fail_count > 0 {
                self.fail_next_requests
                    .store(fail_count - 1, Ordering::SeqCst);
                return Err(RequestError::NetworkError(
                    "Service unavailable".to_string(),
                ));
            }

            let envelope = self.envelope.lock().await.clone();
            envelope.ok_or_else(|| RequestError::NetworkError("No scripted response".to_string()))
        }
    }
}

// One-shot HTTP fixtures over a real socket, so tests cover the actual
// reqwest path including the wire-level query string
#[cfg(test)]
mod http_fixture {
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    // Accepts a single connection, answers with the given status and body,
    // and hands back the raw request head it received
    pub async fn spawn_one_shot(
        status_line: &'static str,
        content_type: &'static str,
        body: String,
    ) -> (SocketAddr, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                head.extend_from_slice(&chunk[..n]);
                if n == 0 || head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                content_type,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });
        (addr, handle)
    }

    // Accepts a connection and never answers, to exercise the timeout path
    pub async fn spawn_stalled() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            drop(stream);
        });
        addr
    }
}
