//! Error taxonomy for site operations.
//!
//! Request-level failures are collected as [`Violation`]s inside
//! [`ValidationErrors`], which knows how to render itself as the JSON body
//! returned to HTTP clients. Missing rows and storage failures are separate
//! [`SiteError`] variants.

use std::fmt;

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::{SiteId, TagKind};

/// Message for a required field that was absent or blank.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message for a site name already held by another site.
pub const NAME_EXISTS_MESSAGE: &str = "This name already exists";

/// Location of an offending value in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The site `name`.
    Name,
    /// The `url` or `category` list itself.
    List(TagKind),
    /// The `description` of the item at `index` in a tag list.
    Description { kind: TagKind, index: usize },
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::List(kind) => write!(f, "{kind}"),
            Self::Description { kind, index } => write!(f, "{kind}[{index}].description"),
        }
    }
}

/// A single reason a create or update request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Required field absent, null or blank.
    MissingField(Field),
    /// Text field longer than the column allows.
    TooLong { field: Field, max: usize },
    /// List supplied but with zero entries.
    EmptyList(TagKind),
    /// Site name already held by another site.
    Conflict,
}

impl Violation {
    fn message(&self) -> String {
        match self {
            Self::MissingField(_) => REQUIRED_MESSAGE.to_string(),
            Self::TooLong { max, .. } => {
                format!("Ensure this field has no more than {max} characters.")
            }
            Self::EmptyList(kind) => kind.empty_list_message().to_string(),
            Self::Conflict => NAME_EXISTS_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) | Self::TooLong { field, .. } => {
                write!(f, "{field}: {}", self.message())
            }
            Self::EmptyList(kind) => write!(f, "{kind}: {}", self.message()),
            Self::Conflict => write!(f, "name: {}", self.message()),
        }
    }
}

/// Ordered collection of violations found while validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the recorded violations in detection order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns `true` if a violation equal to `violation` was recorded.
    pub fn contains(&self, violation: &Violation) -> bool {
        self.violations.contains(violation)
    }

    /// Renders the response body for these violations.
    ///
    /// Field errors become `{"name": ["..."]}`, item errors become a list with
    /// one object per item (`{"url": [{}, {"description": ["..."]}]}`), empty
    /// lists are gathered under `errors`, and a name conflict is reported as a
    /// plain string under `name`.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();

        for violation in &self.violations {
            let message = violation.message();
            match violation {
                Violation::MissingField(field) | Violation::TooLong { field, .. } => {
                    push_field_error(&mut body, *field, message);
                }
                Violation::EmptyList(kind) => {
                    let errors = body
                        .entry("errors")
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(errors) = errors {
                        errors.push(json!({ kind.field(): message }));
                    }
                }
                Violation::Conflict => {
                    body.insert("name".to_string(), Value::String(message));
                }
            }
        }

        Value::Object(body)
    }
}

fn push_field_error(body: &mut Map<String, Value>, field: Field, message: String) {
    match field {
        Field::Name | Field::List(_) => {
            let key = field.to_string();
            let entry = body.entry(key).or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(messages) = entry {
                messages.push(Value::String(message));
            }
        }
        Field::Description { kind, index } => {
            let entry = body
                .entry(kind.field())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                while items.len() <= index {
                    items.push(Value::Object(Map::new()));
                }
                if let Value::Object(item) = &mut items[index] {
                    let messages = item
                        .entry("description")
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(messages) = messages {
                        messages.push(Value::String(message));
                    }
                }
            }
        }
    }
}

impl From<Violation> for ValidationErrors {
    fn from(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Errors returned by the tag store, the site repository and the service.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The request was rejected; nothing was written.
    #[error("invalid site: {0}")]
    Invalid(ValidationErrors),

    /// No site has the given identifier.
    #[error("site {0} not found")]
    NotFound(SiteId),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl SiteError {
    /// Shorthand for a name conflict.
    pub fn conflict() -> Self {
        Self::Invalid(Violation::Conflict.into())
    }
}

impl From<ValidationErrors> for SiteError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Result alias for site operations.
pub type Result<T, E = SiteError> = std::result::Result<T, E>;
