//! Request builder, response parser and the `execute` entry points.
//!
//! # Design
//! `ShufflerClient` holds the immutable configuration, the parsed endpoint
//! URL and a shared `Transport`; nothing changes between calls, so clones
//! and concurrent calls are independent. The single operation is split into
//! `build_request` (produces an `HttpRequest`) and `parse_response`
//! (consumes an `HttpResponse`) so hosts that do their own I/O can skip the
//! transport entirely. `execute` glues the two together around exactly one
//! `Transport::send`.
//!
//! The awaitable and callback forms are thin adapters over `execute` and
//! share its outcome: one `Result` per call, never zero, never two.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{ShuffleQuery, ShuffleResponse};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Client for the card deck shuffler endpoint.
#[derive(Clone)]
pub struct ShufflerClient {
    config: Arc<ClientConfig>,
    endpoint: Url,
    transport: Arc<dyn Transport>,
}

impl ShufflerClient {
    /// Build a client that talks to the service over `ureq`.
    ///
    /// Fails with `ApiError::Configuration` when the API key is blank or the
    /// host/path do not form a valid URL. Nothing is sent over the network.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }

    /// Build a client that sends requests through `transport`.
    pub fn with_transport(
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self, ApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::Configuration("api_key is required".to_string()));
        }
        let base = format!("{}://{}{}", config.scheme(), config.host, config.path);
        let endpoint = Url::parse(&base)
            .map_err(|e| ApiError::Configuration(format!("invalid endpoint {base}: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            endpoint,
            transport: Arc::new(transport),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Endpoint URL without query parameters.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn build_request(&self, query: &ShuffleQuery) -> HttpRequest {
        let mut url = self.endpoint.clone();
        let pairs = query.to_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        HttpRequest {
            url: url.into(),
            headers: vec![
                (API_KEY_HEADER.to_string(), self.config.api_key.clone()),
                ("accept".to_string(), "application/json".to_string()),
            ],
        }
    }

    /// Turn a raw response into an envelope or an error.
    ///
    /// The envelope's `status` decides success, not the HTTP status code.
    pub fn parse_response(&self, response: HttpResponse) -> Result<ShuffleResponse, ApiError> {
        let envelope: ShuffleResponse =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Transport {
                message: format!("malformed response body: {e}"),
                status: Some(response.status),
            })?;

        if envelope.is_ok() {
            return Ok(envelope);
        }
        Err(ApiError::Remote {
            code: envelope.code.unwrap_or(response.status),
            error: envelope.error.unwrap_or_else(|| "Unknown error".to_string()),
            status: envelope.status,
        })
    }

    /// Shuffle with one blocking round trip.
    pub fn execute(&self, query: &ShuffleQuery) -> Result<ShuffleResponse, ApiError> {
        let request = self.build_request(query);
        debug!(url = %request.url, "sending shuffle request");

        let result = self
            .transport
            .send(&request)
            .and_then(|response| self.parse_response(response));

        match &result {
            Ok(envelope) => debug!(
                total_cards = envelope.data.as_ref().map(|d| d.total_cards),
                "shuffle succeeded"
            ),
            Err(ApiError::Remote { code, error, .. }) => {
                warn!(code, error = %error, "shuffle rejected by service")
            }
            Err(err) => warn!(error = %err, "shuffle request failed"),
        }
        result
    }

    /// Awaitable form of `execute`.
    ///
    /// The round trip runs on tokio's blocking pool, so the future must be
    /// polled inside a tokio runtime.
    pub fn execute_async(
        &self,
        query: ShuffleQuery,
    ) -> impl Future<Output = Result<ShuffleResponse, ApiError>> + Send + 'static {
        let client = self.clone();
        async move {
            tokio::task::spawn_blocking(move || client.execute(&query))
                .await
                .map_err(|e| ApiError::transport(format!("shuffle task failed: {e}")))?
        }
    }

    /// Callback form of `execute`.
    ///
    /// `callback` runs exactly once, on a new thread, with the outcome of the
    /// call. Join the returned handle to wait for it.
    pub fn execute_with<F>(&self, query: ShuffleQuery, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<ShuffleResponse, ApiError>) + Send + 'static,
    {
        let client = self.clone();
        std::thread::spawn(move || callback(client.execute(&query)))
    }
}

impl fmt::Debug for ShufflerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShufflerClient")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
