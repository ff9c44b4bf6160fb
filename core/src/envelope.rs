//! Response envelope returned by every Common Sense endpoint.
//!
//! # Design
//! The envelope is decoded as-is. Any valid JSON body decodes: `statusCode`
//! and `count` are read when they hold a number (or a numeric string) and
//! are `None` otherwise, unknown keys are kept in `extra`, and a body that is
//! not a JSON object is kept whole in `response`. Only a body that is not
//! JSON at all fails to decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::query::ResolvedQuery;

/// JSON body of a Common Sense response.
///
/// `T` defaults to `serde_json::Value`. List and search responses carry an
/// array in `response` plus a total `count`. Item responses carry a single
/// object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    #[serde(
        rename = "statusCode",
        default,
        deserialize_with = "lenient_u16",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<u16>,
    #[serde(
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn numeric(value: Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_u16<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(value).and_then(|n| u16::try_from(n).ok()))
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(numeric(Value::deserialize(deserializer)?))
}

impl<T> Envelope<T> {
    /// True when `statusCode` is present and 2xx.
    pub fn is_success(&self) -> bool {
        matches!(self.status_code, Some(200..=299))
    }
}

impl Envelope<Value> {
    /// Decode a response body. Fails only when `body` is not JSON.
    pub fn from_json(body: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(body)? {
            Value::Object(map) => Ok(serde_json::from_value(Value::Object(map))?),
            other => Ok(Envelope {
                status_code: None,
                count: None,
                response: Some(other),
                extra: Map::new(),
            }),
        }
    }

    /// Decode `response` into a caller type. `Ok(None)` when there is none.
    pub fn decode_response<U: DeserializeOwned>(&self) -> Result<Option<U>> {
        match &self.response {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Items of a list or search response. Empty for item and error bodies.
    pub fn items(&self) -> &[Value] {
        match &self.response {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }
}

/// Outcome of a successful round-trip: the decoded envelope plus the exact
/// URL and query that produced it.
#[derive(Debug, Clone)]
pub struct Reply<T = Value> {
    pub url: String,
    pub query: ResolvedQuery,
    pub envelope: Envelope<T>,
}

impl<T> Reply<T> {
    pub fn status_code(&self) -> Option<u16> {
        self.envelope.status_code
    }

    pub fn into_envelope(self) -> Envelope<T> {
        self.envelope
    }
}
