//! Query option merging and query-string encoding.
//!
//! # Design
//! `QueryOptions` is what the caller passes. `ResolvedQuery` is what goes on
//! the wire after merging with the defaults (`limit=10`, `page=1`, no
//! `fields`). A zero `limit` or `page` counts as unset, matching the
//! service's published client behavior. The resolved query is returned to the
//! caller inside `Reply` and never stored on the client.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_PAGE: u32 = 1;

/// Caller-supplied filter and pagination options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Record fields to return. `None` returns full records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Merge these options over the defaults and attach credentials.
    pub fn resolve(&self, client_id: &str, app_id: &str) -> ResolvedQuery {
        ResolvedQuery {
            client_id: client_id.to_string(),
            app_id: app_id.to_string(),
            fields: self
                .fields
                .as_ref()
                .map(|fields| fields.join(","))
                .unwrap_or_default(),
            limit: self.limit.filter(|&n| n > 0).unwrap_or(DEFAULT_LIMIT),
            page: self.page.filter(|&n| n > 0).unwrap_or(DEFAULT_PAGE),
        }
    }
}

/// The query parameters actually sent with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedQuery {
    pub client_id: String,
    pub app_id: String,
    /// Comma-joined field list. Empty means no filtering.
    pub fields: String,
    pub limit: u32,
    pub page: u32,
}

impl ResolvedQuery {
    /// Key/value pairs in wire order. `fields` is left out when empty.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("clientId", self.client_id.clone()),
            ("appId", self.app_id.clone()),
        ];
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.clone()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("page", self.page.to_string()));
        pairs
    }

    /// Percent-encoded `key=value&...` string, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
