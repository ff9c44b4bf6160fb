//! Client library for the Common Sense content catalog API.
//!
//! # Overview
//! `CommonSenseClient` builds `/v3/{platform}/{path}` requests, merges
//! caller query options over the defaults (`limit=10`, `page=1`, no field
//! filter), issues a single GET and decodes the JSON envelope.
//! `EducationApi` and `MediaApi` fix the platform segment. The education
//! facade adds per-content-type accessors, taxonomy terms and search.
//!
//! # Design
//! - Request building and response parsing are pure (`build_request`,
//!   `parse_response`). I/O lives behind the `Transport` trait, with a
//!   `ureq` implementation as the default.
//! - The client holds an `Arc<ClientConfig>` and no per-call state. The
//!   query each call resolved is returned in its `Reply`.
//! - Async calls run the blocking transport on tokio's blocking pool, so
//!   they need a tokio runtime. Polled elsewhere they resolve to
//!   `Error::NoRuntime`. `request_blocking` needs no runtime.
//!
//! # Two error channels
//! `Err` means the request produced no decodable body: a transport
//! failure, a non-JSON body, or an empty path. Rejections by the service
//! (401 bad credentials, 404 unknown resource) come back as `Ok` with the
//! code in `Envelope::status_code`. A JSON body without a usable
//! `statusCode` (a gateway error page, for instance) is also `Ok`, with
//! `status_code` set to `None`. Code that only checks for `Err` will
//! treat a 401 as success. Check `Envelope::is_success` before using the
//! payload.

pub mod client;
pub mod config;
pub mod education;
pub mod envelope;
pub mod error;
pub mod http;
pub mod media;
pub mod query;
pub mod transport;

pub use client::{CommonSenseClient, Platform, PreparedRequest};
pub use config::{ClientConfig, API_VERSION, DEFAULT_HOST};
pub use education::{upper_camel, ContentType, EducationApi, UnknownContentType};
pub use envelope::{Envelope, Reply};
pub use error::{BoxError, Error, Result};
pub use http::{HttpRequest, HttpResponse};
pub use media::MediaApi;
pub use query::{QueryOptions, ResolvedQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use transport::{Transport, UreqTransport};
