//! Blocking HTTP transport behind a trait seam.
//!
//! # Design
//! `Transport` executes one `HttpRequest` and returns the full response. It
//! must hand back 4xx/5xx responses as data: the service reports auth and
//! lookup failures inside the JSON body, and the client surfaces those as
//! envelopes rather than errors.

use crate::error::BoxError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a GET and reads the whole body.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// `Transport` backed by a `ureq` agent with status-as-error disabled.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut builder = self.agent.get(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let mut response = builder.call()?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
