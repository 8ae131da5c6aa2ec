// Thin async client for a hosted reservations backend. The search core
// stays local and pure; this client is for deployments where the snapshot
// lives behind an HTTP service instead. Transport is a trait so tests can
// substitute an in-process backend for the reqwest implementation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

use crate::model::{Reservation, SearchMatch, SearchQuery};
use crate::repository::ReservationRequest;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Status {
        status: u16,
        message: String,
        is_retryable: bool,
    },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Status { is_retryable, .. } => *is_retryable,
            _ => false,
        }
    }
}

/// Retry policy: exponential backoff with jitter.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: 5000,
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ClientStats {
    pub requests_sent: usize,
    pub requests_succeeded: usize,
    pub requests_failed: usize,
    pub requests_retried: usize,
}

/// Exponential backoff with jitter to avoid thundering herds.
pub fn calculate_backoff(retry_attempt: u32, config: &RetryConfig) -> Duration {
    let base_backoff_ms = (config.initial_backoff_ms as f64
        * config.backoff_multiplier.powf(retry_attempt as f64))
    .min(config.max_backoff_ms as f64);

    let jitter = rand::random::<f64>() * config.jitter_factor * base_backoff_ms;
    let backoff_ms = base_backoff_ms * (1.0 - config.jitter_factor / 2.0) + jitter;

    Duration::from_millis(backoff_ms as u64)
}

/// One round trip to the backend, without retry. The production
/// implementation is `HttpTransport`; tests plug in an in-process one.
#[async_trait]
pub trait ReservationsTransport: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchMatch>, ClientError>;

    async fn available_slots(
        &self,
        restaurant_id: &str,
        date: &str,
        party_size: u32,
    ) -> Result<Vec<String>, ClientError>;

    async fn book(&self, request: &ReservationRequest) -> Result<Reservation, ClientError>;

    async fn cancel(&self, reservation_id: &str) -> Result<Reservation, ClientError>;
}

/// The outbound reservations interface, with retry applied.
#[async_trait]
pub trait ReservationsApi: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchMatch>, ClientError>;

    async fn available_slots(
        &self,
        restaurant_id: &str,
        date: &str,
        party_size: u32,
    ) -> Result<Vec<String>, ClientError>;

    async fn book(&self, request: &ReservationRequest) -> Result<Reservation, ClientError>;

    async fn cancel(&self, reservation_id: &str) -> Result<Reservation, ClientError>;

    fn stats(&self) -> ClientStats;
}

/// reqwest JSON transport against `base_url`.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.base_url.is_empty() {
            return Err(ClientError::Config("base_url must not be empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
                is_retryable: status.is_server_error(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ReservationsTransport for HttpTransport {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchMatch>, ClientError> {
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(query)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn available_slots(
        &self,
        restaurant_id: &str,
        date: &str,
        party_size: u32,
    ) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .get(format!("{}/restaurants/{}/slots", self.base_url, restaurant_id))
            .query(&[("date", date), ("partySize", &party_size.to_string())])
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn book(&self, request: &ReservationRequest) -> Result<Reservation, ClientError> {
        let response = self
            .http
            .post(format!("{}/reservations", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn cancel(&self, reservation_id: &str) -> Result<Reservation, ClientError> {
        let response = self
            .http
            .delete(format!("{}/reservations/{}", self.base_url, reservation_id))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }
}

/// Retrying client over any transport.
pub struct ReservationsClient<T: ReservationsTransport> {
    transport: T,
    retry: RetryConfig,
    stats: Arc<Mutex<ClientStats>>,
}

impl ReservationsClient<HttpTransport> {
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.retry))
    }
}

impl<T: ReservationsTransport> ReservationsClient<T> {
    pub fn with_transport(transport: T, retry: RetryConfig) -> Self {
        Self {
            transport,
            retry,
            stats: Arc::new(Mutex::new(ClientStats::default())),
        }
    }

    /// Fans one query per restaurant-hunting session out concurrently.
    /// Each element carries its own result; one failure does not abort the
    /// batch.
    pub async fn search_many(
        &self,
        queries: &[SearchQuery],
    ) -> Vec<Result<Vec<SearchMatch>, ClientError>> {
        futures::future::join_all(
            queries
                .iter()
                .map(|query| self.run(move || self.transport.search(query))),
        )
        .await
    }

    // Retry loop shared by every operation: retryable failures back off and
    // try again up to the configured budget; others surface immediately.
    async fn run<R, F, Fut>(&self, mut op: F) -> Result<R, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, ClientError>>,
    {
        let mut attempt = 0;
        loop {
            self.stats.lock().requests_sent += 1;
            match op().await {
                Ok(value) => {
                    self.stats.lock().requests_succeeded += 1;
                    return Ok(value);
                }
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let backoff = calculate_backoff(attempt, &self.retry);
                    warn!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "retrying backend request"
                    );
                    {
                        let mut stats = self.stats.lock();
                        stats.requests_retried += 1;
                    }
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    self.stats.lock().requests_failed += 1;
                    if err.is_retryable() {
                        return Err(ClientError::RetriesExhausted {
                            attempts: attempt + 1,
                            last_error: err.to_string(),
                        });
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[async_trait]
impl<T: ReservationsTransport> ReservationsApi for ReservationsClient<T> {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchMatch>, ClientError> {
        self.run(move || self.transport.search(query)).await
    }

    async fn available_slots(
        &self,
        restaurant_id: &str,
        date: &str,
        party_size: u32,
    ) -> Result<Vec<String>, ClientError> {
        self.run(move || self.transport.available_slots(restaurant_id, date, party_size))
            .await
    }

    async fn book(&self, request: &ReservationRequest) -> Result<Reservation, ClientError> {
        self.run(move || self.transport.book(request)).await
    }

    async fn cancel(&self, reservation_id: &str) -> Result<Reservation, ClientError> {
        self.run(move || self.transport.cancel(reservation_id)).await
    }

    fn stats(&self) -> ClientStats {
        self.stats.lock().clone()
    }
}
