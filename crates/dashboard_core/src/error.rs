use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FieldProblem {
    Missing,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidStatus { value: String },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => write!(f, "is required"),
            FieldProblem::TooShort { min } => write!(f, "must be at least {min} characters"),
            FieldProblem::TooLong { max } => write!(f, "must be at most {max} characters"),
            FieldProblem::InvalidStatus { value } => {
                write!(f, "must be one of active, inactive, pending (got {value:?})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl FieldError {
    pub fn new(field: &'static str, problem: FieldProblem) -> Self {
        Self { field, problem }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.problem)
    }
}

/// A create payload was missing fields or had out-of-range values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid item: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|error| error.field).collect()
    }

    pub fn problem_for(&self, field: &str) -> Option<&FieldProblem> {
        self.fields
            .iter()
            .find(|error| error.field == field)
            .map(|error| &error.problem)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("item {id:?} not found")]
pub struct NotFoundError {
    pub id: String,
}
