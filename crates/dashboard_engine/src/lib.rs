//! Dashboard engine: item store, HTTP service, fetch boundary and effect execution.
mod client;
mod debounce;
mod engine;
mod seed;
mod server;
mod store;
mod types;

pub use client::{FetchSettings, HttpItemsClient, ItemsApi, LocalItemsApi};
pub use debounce::Debouncer;
pub use engine::EngineHandle;
pub use seed::seed_items;
pub use server::{router, serve, ApiError};
pub use store::{Clock, ItemStore};
pub use types::{EngineEvent, ErrorBody, FailureKind, FieldDetail, TransportError};
