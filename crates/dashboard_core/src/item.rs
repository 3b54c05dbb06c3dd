use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldProblem, ValidationError};

pub type ItemId = String;

/// Accepted title length in characters, after trimming.
pub const TITLE_LEN: RangeInclusive<usize> = 3..=100;
/// Accepted description length in characters, after trimming.
pub const DESCRIPTION_LEN: RangeInclusive<usize> = 10..=500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Inactive,
    Pending,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [ItemStatus::Active, ItemStatus::Inactive, ItemStatus::Pending];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
            ItemStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload as it arrives from a caller.
///
/// Every field is optional so that an absent field surfaces as a
/// [`ValidationError`] naming it rather than as a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A create payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
}

impl CreateItemRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            status: Some(status.as_str().to_string()),
        }
    }

    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        let mut errors = Vec::new();

        let title = check_text("title", self.title.as_deref(), TITLE_LEN, &mut errors);
        let description = check_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_LEN,
            &mut errors,
        );
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(FieldError::new("status", FieldProblem::Missing));
                None
            }
            Some(raw) => match raw.parse::<ItemStatus>() {
                Ok(status) => Some(status),
                Err(()) => {
                    errors.push(FieldError::new(
                        "status",
                        FieldProblem::InvalidStatus {
                            value: raw.to_string(),
                        },
                    ));
                    None
                }
            },
        };

        match (title, description, status) {
            (Some(title), Some(description), Some(status)) if errors.is_empty() => Ok(NewItem {
                title,
                description,
                status,
            }),
            _ => Err(ValidationError::new(errors)),
        }
    }
}

fn check_text(
    field: &'static str,
    value: Option<&str>,
    bounds: RangeInclusive<usize>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, FieldProblem::Missing));
        return None;
    }
    let len = trimmed.chars().count();
    if len < *bounds.start() {
        errors.push(FieldError::new(
            field,
            FieldProblem::TooShort {
                min: *bounds.start(),
            },
        ));
        return None;
    }
    if len > *bounds.end() {
        errors.push(FieldError::new(
            field,
            FieldProblem::TooLong { max: *bounds.end() },
        ));
        return None;
    }
    Some(trimmed.to_string())
}
