//! Inbound request payloads and their validation.

use crate::models::OrgType;
use secrecy::Secret;
use serde_json::{Map, Value};
use thiserror::Error;

/// A validated usage request.
#[derive(Debug, Clone)]
pub struct UsageQuery {
    pub token: Secret<String>,
    pub org_name: String,
    pub org_type: OrgType,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Why an inbound usage request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("Invalid JSON format")]
    MalformedBody,

    #[error("Missing or invalid {0} parameter")]
    MissingField(&'static str),

    #[error("orgType must be \"organization\" or \"enterprise\"")]
    UnsupportedOrgType,

    #[error("Invalid {0} parameter")]
    InvalidField(&'static str),
}

/// Parse and validate a raw request body.
///
/// A body that is not a JSON object is rejected before any field is looked
/// at.
pub fn parse_usage_request(body: &[u8]) -> Result<UsageQuery, RequestValidationError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| RequestValidationError::MalformedBody)?;
    validate_usage_request(&value)
}

/// Validate an already-decoded JSON payload.
pub fn validate_usage_request(body: &Value) -> Result<UsageQuery, RequestValidationError> {
    let fields = body
        .as_object()
        .ok_or(RequestValidationError::MalformedBody)?;

    let token = required_string(fields, "token")?;
    let org_name = required_string(fields, "orgName")?;
    let org_type = required_string(fields, "orgType")?
        .parse::<OrgType>()
        .map_err(|_| RequestValidationError::UnsupportedOrgType)?;

    Ok(UsageQuery {
        token: Secret::new(token),
        org_name,
        org_type,
        start_date: optional_string(fields, "startDate")?,
        end_date: optional_string(fields, "endDate")?,
    })
}

fn required_string(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<String, RequestValidationError> {
    match fields.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(RequestValidationError::MissingField(name)),
    }
}

/// Absent, `null` and `""` all mean "not supplied".
fn optional_string(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, RequestValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(RequestValidationError::InvalidField(name)),
    }
}
