//! Field-level validation errors.
//!
//! Every way a submission can be rejected ends up as a [`FieldErrors`] value: declarative
//! schema checks (`validator`), JSON shape errors (`serde_path_to_error`), and typed
//! conversions. Callers get one list naming each offending field.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// One rejected field and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

/// All field errors for one submission, sorted by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, reason);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            reason: reason.into(),
        });
        self.0.sort_by(|a, b| a.field.cmp(&b.field));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Names of the offending fields, deduplicated, in sorted order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.0.iter().map(|e| e.field.as_str()).collect();
        fields.dedup();
        fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.reason))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let reason = match &error.message {
                    Some(message) => message.to_string(),
                    None => describe_code(&error.code),
                };
                out.push(field.to_string(), reason);
            }
        }
        out
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for FieldErrors {
    fn from(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = error.path().to_string();
        let inner = error.into_inner();
        let field = if path.is_empty() || path == "." || inner.is_syntax() || inner.is_eof() {
            "body".to_string()
        } else {
            path
        };
        FieldErrors::single(field, inner.to_string())
    }
}

/// Decodes a JSON request body, reporting failures as field errors.
///
/// The whole input must be one JSON value; trailing non-whitespace is reported against `body`.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, FieldErrors> {
    let de = &mut serde_json::Deserializer::from_slice(body);
    let value: T = serde_path_to_error::deserialize(&mut *de)?;
    de.end().map_err(|e| FieldErrors::single("body", e.to_string()))?;
    Ok(value)
}

fn describe_code(code: &str) -> String {
    match code {
        "required" => "field is required".into(),
        "range" => "must be zero or greater".into(),
        other => other.replace('_', " "),
    }
}
