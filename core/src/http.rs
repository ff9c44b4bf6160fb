//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `CommonSenseClient::build_request`
//! produces an `HttpRequest` and `CommonSenseClient::parse_response` consumes
//! an `HttpResponse`, so both halves can be tested without a network. The
//! `Transport` trait in `transport.rs` sits between them.
//!
//! The Common Sense API is read-only, so every request is a GET and the type
//! carries no method or body.

/// An HTTP GET described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL including the encoded query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data, with the body read to the end.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
