//! HTTP surface of the item service.
//!
//! Routes:
//! - `GET /api/items` lists one page, filtered by `search`, `status`, `page`, `limit`
//! - `GET /api/items/:id` fetches a single item
//! - `POST /api/items` creates an item and answers `201 Created`
//! - `GET /api/health` liveness probe
//!
//! Every error answers with an [`ErrorBody`] JSON payload.

use std::io;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use dashboard_core::{
    CreateItemRequest, FieldProblem, FilterSpec, Item, NotFoundError, PageResult,
    RawListParams, ValidationError,
};
use dashboard_logging::{dash_info, dash_warn};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::store::ItemStore;
use crate::types::{ErrorBody, FieldDetail};

/// Failure of a single API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", validation_message(.0))]
    Validation(#[from] ValidationError),
    #[error("Item not found")]
    NotFound(#[from] NotFoundError),
    #[error("Invalid request body")]
    Malformed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Malformed(_) => "MALFORMED_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
        }
    }

    pub(crate) fn body(&self) -> ErrorBody {
        let fields = match self {
            ApiError::Validation(err) => err
                .fields
                .iter()
                .map(|field| FieldDetail {
                    field: field.field.to_string(),
                    message: field.problem.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        ErrorBody {
            error: self.to_string(),
            code: self.code().to_string(),
            fields,
        }
    }
}

/// Absent fields keep the form's summary sentence; anything else names the broken rule.
fn validation_message(err: &ValidationError) -> String {
    let only_missing = err
        .fields
        .iter()
        .all(|field| field.problem == FieldProblem::Missing);
    if only_missing {
        "Title, description, and status are required".to_string()
    } else {
        err.to_string()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

pub fn router(store: Arc<ItemStore>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/:id", get(get_item))
        .layer(cors_layer())
        .with_state(store)
}

/// Serves the API on `listener` until the task is dropped or the listener fails.
pub async fn serve(listener: TcpListener, store: Arc<ItemStore>) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        dash_info!("item service listening on http://{addr}");
    }
    axum::serve(listener, router(store)).await
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_items(
    State(store): State<Arc<ItemStore>>,
    Query(params): Query<RawListParams>,
) -> Json<PageResult> {
    let spec = FilterSpec::from_params(&params);
    let page = store.list(&spec);
    dash_info!(
        "GET /api/items page={} limit={} -> {} of {}",
        page.page,
        page.limit,
        page.items.len(),
        page.total
    );
    Json(page)
}

async fn get_item(
    State(store): State<Arc<ItemStore>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    match store.get(&id) {
        Ok(item) => Ok(Json(item)),
        Err(err) => {
            dash_warn!("GET /api/items/{id}: {err}");
            Err(err.into())
        }
    }
}

async fn create_item(
    State(store): State<Arc<ItemStore>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let request: CreateItemRequest = serde_json::from_slice(&body).map_err(|err| {
        dash_warn!("POST /api/items: unreadable body: {err}");
        ApiError::Malformed(err.to_string())
    })?;
    let item = store.create(&request).map_err(|err| {
        dash_warn!("POST /api/items: {err}");
        ApiError::from(err)
    })?;
    Ok((StatusCode::CREATED, Json(item)))
}
