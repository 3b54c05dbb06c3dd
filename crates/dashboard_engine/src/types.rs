use std::fmt;

use dashboard_core::{Item, PageResult, RequestId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ListCompleted {
        request_id: RequestId,
        result: Result<PageResult, TransportError>,
    },
    CreateCompleted {
        request_id: RequestId,
        result: Result<Item, TransportError>,
    },
    ItemCompleted {
        request_id: RequestId,
        result: Result<Item, TransportError>,
    },
    DebounceElapsed {
        generation: u64,
    },
}

/// A call across the fetch boundary failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({message})")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedBody,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedBody => write!(f, "malformed response body"),
        }
    }
}

/// JSON error payload returned by the item service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDetail>,
}

impl ErrorBody {
    /// The headline plus any per-field detail it does not already spell out.
    pub fn describe(&self) -> String {
        let details: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.field, field.message))
            .filter(|detail| !self.error.contains(detail.as_str()))
            .collect();
        if details.is_empty() {
            self.error.clone()
        } else {
            format!("{}: {}", self.error, details.join("; "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}
