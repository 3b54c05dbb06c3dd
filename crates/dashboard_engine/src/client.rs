use std::sync::Arc;
use std::time::Duration;

use dashboard_core::{CreateItemRequest, FilterSpec, Item, PageResult};
use dashboard_logging::dash_debug;
use futures_util::StreamExt;
use reqwest::{header::CONTENT_TYPE, Response, Url};
use serde::de::DeserializeOwned;

use crate::server::ApiError;
use crate::store::ItemStore;
use crate::types::{ErrorBody, FailureKind, TransportError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// The three item operations, independent of where the items live.
#[async_trait::async_trait]
pub trait ItemsApi: Send + Sync {
    async fn list(&self, filters: &FilterSpec) -> Result<PageResult, TransportError>;
    async fn get(&self, id: &str) -> Result<Item, TransportError>;
    async fn create(&self, request: &CreateItemRequest) -> Result<Item, TransportError>;
}

/// Talks to a running item service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpItemsClient {
    base: Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpItemsClient {
    pub fn new(base_url: &str, settings: &FetchSettings) -> Result<Self, TransportError> {
        let base = Url::parse(base_url)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(TransportError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base,
            client,
            max_bytes: settings.max_bytes,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::new(FailureKind::InvalidUrl, self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, TransportError> {
        let status = response.status();
        let bytes = self.read_body(response).await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.describe())
                .unwrap_or_else(|_| status.to_string());
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }
        serde_json::from_slice(&bytes)
            .map_err(|err| TransportError::new(FailureKind::MalformedBody, err.to_string()))
    }

    async fn read_body(&self, response: Response) -> Result<Vec<u8>, TransportError> {
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > self.max_bytes {
                return Err(TransportError::new(
                    FailureKind::MalformedBody,
                    format!("response exceeds {} bytes", self.max_bytes),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ItemsApi for HttpItemsClient {
    async fn list(&self, filters: &FilterSpec) -> Result<PageResult, TransportError> {
        let mut url = self.endpoint(&["api", "items"])?;
        url.query_pairs_mut().extend_pairs(filters.to_query_pairs());
        dash_debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }

    async fn get(&self, id: &str) -> Result<Item, TransportError> {
        let url = self.endpoint(&["api", "items", id])?;
        dash_debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }

    async fn create(&self, request: &CreateItemRequest) -> Result<Item, TransportError> {
        let url = self.endpoint(&["api", "items"])?;
        let body = serde_json::to_vec(request)
            .map_err(|err| TransportError::new(FailureKind::MalformedBody, err.to_string()))?;
        dash_debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}

/// Serves item operations straight from an in-process store.
///
/// Failures carry the same status and message the HTTP service would answer with.
#[derive(Debug, Clone)]
pub struct LocalItemsApi {
    store: Arc<ItemStore>,
}

impl LocalItemsApi {
    pub fn new(store: Arc<ItemStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl ItemsApi for LocalItemsApi {
    async fn list(&self, filters: &FilterSpec) -> Result<PageResult, TransportError> {
        Ok(self.store.list(filters))
    }

    async fn get(&self, id: &str) -> Result<Item, TransportError> {
        self.store.get(id).map_err(|err| as_transport(err.into()))
    }

    async fn create(&self, request: &CreateItemRequest) -> Result<Item, TransportError> {
        self.store.create(request).map_err(|err| as_transport(err.into()))
    }
}

fn as_transport(err: ApiError) -> TransportError {
    TransportError::new(
        FailureKind::HttpStatus(err.status().as_u16()),
        err.body().describe(),
    )
}
