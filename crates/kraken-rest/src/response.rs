//! Response normalization
//!
//! Every Kraken response is a JSON object of the form
//! `{"error": [...], "result": ...}`. Error strings are formatted as
//! `E<Category>:<Message>`, e.g. `EGeneral:Invalid arguments`.

use crate::error::{RestError, RestResult};
use serde_json::Value;
use std::fmt;

/// Kraken error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// EAPI:* - API-level issues (keys, nonces, rate limits)
    Api,
    /// EGeneral:* - General errors
    General,
    /// EService:* - Service availability
    Service,
    /// EOrder:* - Trading/order errors
    Order,
    /// EFunding:* - Deposit/withdrawal errors
    Funding,
    /// EQuery:* - Query/search errors
    Query,
    /// ETrade:* - Trade execution errors
    Trade,
    /// ESession:* - Session errors
    Session,
    /// Unknown error category
    Unknown,
}

/// Canonical error code reported by Kraken, with the leading `E` removed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteErrorCode {
    code: String,
}

impl RemoteErrorCode {
    /// Wrap a code such as `General:Invalid arguments`
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// The full code, e.g. `General:Invalid arguments`
    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn category(&self) -> ErrorCategory {
        let prefix = self.code.split_once(':').map_or(self.code.as_str(), |(p, _)| p);
        match prefix {
            "API" => ErrorCategory::Api,
            "General" => ErrorCategory::General,
            "Service" => ErrorCategory::Service,
            "Order" => ErrorCategory::Order,
            "Funding" => ErrorCategory::Funding,
            "Query" => ErrorCategory::Query,
            "Trade" => ErrorCategory::Trade,
            "Session" => ErrorCategory::Session,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Text after the category, or the whole code if there is no category
    pub fn message(&self) -> &str {
        self.code
            .split_once(':')
            .map_or(self.code.as_str(), |(_, m)| m)
            .trim()
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self.code.as_str(),
            "API:Rate limit exceeded" | "General:Too many requests" | "Order:Rate limit exceeded"
        )
    }
}

impl fmt::Display for RemoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Map a raw response body to the call result
///
/// - body is not a JSON object: [`RestError::Protocol`]
/// - non-empty `error` array: [`RestError::Remote`] for the first string entry
///   starting with `E`, otherwise [`RestError::UnknownRemote`]
/// - otherwise the `result` field, or the whole body when `result` is absent
pub fn normalize(body: &str) -> RestResult<Value> {
    let mut parsed: Value = serde_json::from_str(body).map_err(|e| RestError::Protocol {
        message: e.to_string(),
        raw: body.to_string(),
    })?;

    let object = parsed.as_object_mut().ok_or_else(|| RestError::Protocol {
        message: "response is not a JSON object".to_string(),
        raw: body.to_string(),
    })?;

    match object.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::Array(errors)) if errors.is_empty() => {}
        Some(Value::Array(errors)) => return Err(classify(errors)),
        Some(other) => {
            return Err(RestError::UnknownRemote {
                errors: vec![other.clone()],
            })
        }
    }

    let has_result = !matches!(object.get("result"), None | Some(Value::Null));
    if has_result {
        if let Some(result) = object.remove("result") {
            return Ok(result);
        }
    }
    Ok(parsed)
}

fn classify(errors: &[Value]) -> RestError {
    errors
        .iter()
        .filter_map(Value::as_str)
        .find_map(|e| e.strip_prefix('E'))
        .map(|code| RestError::Remote(RemoteErrorCode::new(code)))
        .unwrap_or_else(|| RestError::UnknownRemote {
            errors: errors.to_vec(),
        })
}
