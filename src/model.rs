//! Data models for the link builder
//!
//! This module defines the structures shared by the composer, the local
//! storage slots and the HTTP layer. Field names match the JSON persisted
//! in the `linkly_last_link` and `linkly_errors` slots.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Keys pre-filled in a fresh form, in display order.
pub const DEFAULT_PARAM_KEYS: [&str; 4] = ["utm_source", "utm_medium", "utm_campaign", "utm_term"];

/// A single query parameter to append to the base link
///
/// Pairs with an empty key or an empty value are skipped by the composer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Both halves are non-empty, so the pair will be emitted.
    pub fn is_applicable(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty()
    }
}

/// Input of the composer: a raw base link and its ordered parameters
///
/// # Example
/// ```json
/// {
///   "link": "example.com/landing",
///   "params": [{ "key": "utm_source", "value": "google" }]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkRequest {
    /// Free-text base link, possibly without a scheme
    pub link: String,

    /// Parameters in the order they should appear in the query string
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl LinkRequest {
    pub fn new(link: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self {
            link: link.into(),
            params,
        }
    }

    /// The template a blank form starts from.
    pub fn template() -> Self {
        Self {
            link: String::new(),
            params: DEFAULT_PARAM_KEYS
                .iter()
                .map(|key| Parameter::new(*key, ""))
                .collect(),
        }
    }

    /// Form-level validation run before submission
    ///
    /// The composer itself is lenient and silently skips incomplete pairs;
    /// the form is stricter and refuses to submit them at all. Errors are
    /// keyed by field path (`link`, `params.1.value`, ...).
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut fields = BTreeMap::new();

        if self.link.trim().is_empty() {
            fields.insert("link".to_string(), "URL is required".to_string());
        }

        for (index, param) in self.params.iter().enumerate() {
            if param.key.is_empty() {
                fields.insert(format!("params.{index}.key"), "Key is required".to_string());
            }
            if param.value.is_empty() {
                fields.insert(
                    format!("params.{index}.value"),
                    "Value is required".to_string(),
                );
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { fields })
        }
    }
}

/// Field-path to message map produced by [`LinkRequest::validate`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub fields: BTreeMap<String, String>,
}

/// The last successfully built link, kept in the `linkly_last_link` slot
///
/// Serialized flat: `{link, params, url, timestamp}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredLink {
    #[serde(flatten)]
    pub request: LinkRequest,

    /// The composed URL as shown to the user
    pub url: String,

    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl StoredLink {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// One diagnostic record in the `linkly_errors` rolling log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorLogEntry {
    pub message: String,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ErrorLogEntry {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Response body for `GET /api/errors`
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorListResponse {
    pub count: usize,
    pub data: Vec<ErrorLogEntry>,
}

/// Current time as stored in the slots.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Response body for `POST /api/links`
///
/// # Example
/// ```json
/// {
///   "link": "example.com",
///   "params": [{ "key": "utm_source", "value": "google" }],
///   "url": "example.com/?utm_source=google",
///   "timestamp": 1705501234567,
///   "saved": true
/// }
/// ```
#[derive(Serialize, Deserialize, Debug)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub link: StoredLink,

    /// Whether the link was written to the last-link slot
    pub saved: bool,
}
