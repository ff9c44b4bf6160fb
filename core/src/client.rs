//! Request builder, dispatcher and response parser for the Common Sense API.
//!
//! # Design
//! `CommonSenseClient` holds the shared configuration, a platform tag and a
//! transport. It keeps no per-call state. The query each call resolved is
//! returned in its `Reply`, so concurrent calls on one client cannot observe
//! each other. Requests are built and parsed without I/O
//! (`build_request` / `parse_response`). Dispatch goes through a
//! `Transport`, run on tokio's blocking pool for the async entry points.

use std::fmt;
use std::sync::Arc;

use crate::config::{ClientConfig, API_VERSION};
use crate::education::EducationApi;
use crate::envelope::{Envelope, Reply};
use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::media::MediaApi;
use crate::query::{QueryOptions, ResolvedQuery};
use crate::transport::{Transport, UreqTransport};

/// Top-level API scope segment of every request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Global,
    Education,
    Media,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Global => "global",
            Platform::Education => "education",
            Platform::Media => "media",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A built request plus the query it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub http: HttpRequest,
    pub query: ResolvedQuery,
}

/// Client for the Common Sense API, scoped to one platform.
#[derive(Clone)]
pub struct CommonSenseClient {
    config: Arc<ClientConfig>,
    platform: Platform,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for CommonSenseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonSenseClient")
            .field("host", &self.config.host())
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl CommonSenseClient {
    /// Global-platform client using the default `ureq` transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport::new()))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            platform: Platform::Global,
            transport,
        }
    }

    /// Same configuration and transport, different platform segment.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    pub fn app_id(&self) -> &str {
        &self.config.app_id
    }

    pub fn host(&self) -> &str {
        self.config.host()
    }

    pub fn version(&self) -> u32 {
        API_VERSION
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// `/v3/{platform}/{path}` with each path segment percent-encoded.
    pub fn resource_path(&self, path: &str) -> String {
        let encoded = path
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        format!("/v{}/{}/{}", API_VERSION, self.platform, encoded)
    }

    pub fn build_request(&self, path: &str, options: &QueryOptions) -> Result<PreparedRequest> {
        if path.is_empty() {
            return Err(Error::EmptyPath);
        }
        let query = options.resolve(&self.config.client_id, &self.config.app_id);
        let url = format!(
            "{}{}?{}",
            self.config.host(),
            self.resource_path(path),
            query.to_query_string()
        );
        Ok(PreparedRequest {
            http: HttpRequest {
                url,
                headers: vec![("accept".to_string(), "application/json".to_string())],
            },
            query,
        })
    }

    /// Decode the body as an envelope. The HTTP status is not consulted.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Envelope> {
        decode_envelope(response)
    }

    /// Issue one GET for `path` and decode the envelope.
    ///
    /// Resolves to `Ok` whenever a JSON body came back, including 401 and 404
    /// envelopes. Only transport failures and undecodable bodies are `Err`.
    /// Polled outside a tokio runtime it resolves to `Error::NoRuntime`.
    pub async fn request(&self, path: &str, options: &QueryOptions) -> Result<Reply> {
        let runtime = runtime_handle()?;
        let prepared = self.build_request(path, options)?;
        let transport = Arc::clone(&self.transport);
        runtime
            .spawn_blocking(move || dispatch(transport.as_ref(), prepared))
            .await?
    }

    /// Blocking counterpart of `request`, for callers without a runtime.
    pub fn request_blocking(&self, path: &str, options: &QueryOptions) -> Result<Reply> {
        let prepared = self.build_request(path, options)?;
        dispatch(self.transport.as_ref(), prepared)
    }

    pub async fn get_list(&self, content_type: &str, options: &QueryOptions) -> Result<Reply> {
        self.request(content_type, options).await
    }

    pub async fn get_item(
        &self,
        content_type: &str,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.request(&format!("{content_type}/{id}"), options).await
    }

    /// A new education facade sharing this client's configuration.
    pub fn education(&self) -> EducationApi {
        EducationApi::from_client(self)
    }

    /// A new media facade sharing this client's configuration.
    pub fn media(&self) -> MediaApi {
        MediaApi::from_client(self)
    }
}

fn dispatch(transport: &dyn Transport, prepared: PreparedRequest) -> Result<Reply> {
    let PreparedRequest { http, query } = prepared;
    let path = http.url.split('?').next().unwrap_or_default().to_string();
    tracing::debug!(%path, limit = query.limit, page = query.page, "sending request");
    tracing::trace!(url = %http.url, "full request url");

    let response = transport.execute(&http).map_err(|source| {
        tracing::warn!(%path, error = %source, "transport failure");
        Error::Transport {
            url: path.clone(),
            source,
        }
    })?;

    let http_status = response.status;
    let envelope = decode_envelope(response)?;
    tracing::debug!(
        %path,
        http_status,
        status_code = ?envelope.status_code,
        "received envelope"
    );

    Ok(Reply {
        url: http.url,
        query,
        envelope,
    })
}

fn runtime_handle() -> Result<tokio::runtime::Handle> {
    tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)
}

fn decode_envelope(response: HttpResponse) -> Result<Envelope> {
    Envelope::from_json(&response.body).inspect_err(|err| {
        tracing::warn!(
            http_status = response.status,
            content_type = response.header("content-type").unwrap_or("<none>"),
            error = %err,
            "response body is not JSON"
        );
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::BoxError;

    /// Records every request and answers with a fixed response.
    pub(crate) struct StubTransport {
        pub(crate) seen: Mutex<Vec<HttpRequest>>,
        status: u16,
        body: String,
    }

    impl StubTransport {
        pub(crate) fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                status,
                body: body.to_string(),
            })
        }

        pub(crate) fn last_url(&self) -> String {
            self.seen.lock().unwrap().last().unwrap().url.clone()
        }
    }

    impl Transport for StubTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, BoxError> {
            Err("connection reset by peer".into())
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new("client", "app").with_host("http://localhost:3000")
    }

    fn client() -> CommonSenseClient {
        CommonSenseClient::new(config())
    }

    #[test]
    fn new_client_is_global_v3() {
        let client = client();
        assert_eq!(client.platform(), Platform::Global);
        assert_eq!(client.version(), 3);
        assert_eq!(client.client_id(), "client");
        assert_eq!(client.app_id(), "app");
    }

    #[test]
    fn build_request_with_defaults() {
        let req = client().build_request("products", &QueryOptions::new()).unwrap();
        assert_eq!(
            req.http.url,
            "http://localhost:3000/v3/global/products?clientId=client&appId=app&limit=10&page=1"
        );
        assert_eq!(req.query.limit, 10);
        assert_eq!(req.query.page, 1);
        assert_eq!(
            req.http.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_request_uses_platform_segment() {
        let client = client().with_platform(Platform::Education);
        let req = client
            .build_request("products/42", &QueryOptions::new().with_limit(5).with_page(2))
            .unwrap();
        assert_eq!(
            req.http.url,
            "http://localhost:3000/v3/education/products/42?clientId=client&appId=app&limit=5&page=2"
        );
    }

    #[test]
    fn build_request_rejects_empty_path() {
        let err = client().build_request("", &QueryOptions::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyPath));
    }

    #[test]
    fn path_segments_are_encoded_but_slashes_kept() {
        let path = client().resource_path("search/products/math games");
        assert_eq!(path, "/v3/global/search/products/math%20games");
    }

    #[test]
    fn default_host_is_production() {
        let client = CommonSenseClient::new(ClientConfig::new("client", "app"));
        let req = client.build_request("products", &QueryOptions::new()).unwrap();
        assert!(req.http.url.starts_with("https://api.commonsense.org/v3/global/products?"));
    }

    #[test]
    fn parse_response_keeps_http_errors_as_envelopes() {
        let response = HttpResponse {
            status: 401,
            headers: Vec::new(),
            body: r#"{"statusCode":401,"error":"Unauthorized"}"#.to_string(),
        };
        let envelope = client().parse_response(response).unwrap();
        assert_eq!(envelope.status_code, Some(401));
        assert!(!envelope.is_success());
    }

    #[test]
    fn parse_response_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        let err = client().parse_response(response).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn request_blocking_returns_resolved_query() {
        let stub = StubTransport::new(200, r#"{"statusCode":200,"count":0,"response":[]}"#);
        let client = CommonSenseClient::with_transport(config(), stub.clone());
        let reply = client
            .request_blocking("products", &QueryOptions::new().with_fields(["id", "title"]))
            .unwrap();
        assert_eq!(reply.status_code(), Some(200));
        assert_eq!(reply.query.fields, "id,title");
        assert_eq!(reply.url, stub.last_url());
        assert!(reply.url.contains("fields=id%2Ctitle"));
    }

    #[test]
    fn not_found_is_not_an_error() {
        let stub = StubTransport::new(404, r#"{"statusCode":404,"error":"Not Found"}"#);
        let client = CommonSenseClient::with_transport(config(), stub);
        let reply = client.request_blocking("foo", &QueryOptions::new()).unwrap();
        assert_eq!(reply.status_code(), Some(404));
    }

    #[test]
    fn gateway_body_without_status_code_is_ok() {
        let stub = StubTransport::new(502, r#"{"message":"Internal server error"}"#);
        let client = CommonSenseClient::with_transport(config(), stub);
        let reply = client.request_blocking("products", &QueryOptions::new()).unwrap();
        assert_eq!(reply.status_code(), None);
        assert_eq!(reply.envelope.extra["message"], "Internal server error");
    }

    #[test]
    fn string_status_code_is_ok() {
        let response = HttpResponse {
            status: 401,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: r#"{"statusCode":"401","error":"Unauthorized"}"#.to_string(),
        };
        let envelope = client().parse_response(response).unwrap();
        assert_eq!(envelope.status_code, Some(401));
    }

    #[test]
    fn request_outside_runtime_is_an_error() {
        let stub = StubTransport::new(200, r#"{"statusCode":200}"#);
        let client = CommonSenseClient::with_transport(config(), stub.clone());
        let options = QueryOptions::new();
        let err = poll_once(client.request("products", &options))
            .expect("ready on first poll")
            .unwrap_err();
        assert!(matches!(err, Error::NoRuntime));
        assert!(!err.is_transport());
        assert!(stub.seen.lock().unwrap().is_empty());
    }

    /// Poll a future a single time on the current thread.
    fn poll_once<F: std::future::Future>(future: F) -> Option<F::Output> {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn clone(_: *const ()) -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        fn noop(_: *const ()) {}
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

        let waker = unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) };
        let mut cx = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(output) => Some(output),
            Poll::Pending => None,
        }
    }

    #[test]
    fn transport_failure_is_an_error() {
        let client = CommonSenseClient::with_transport(config(), Arc::new(FailingTransport));
        let err = client.request_blocking("products", &QueryOptions::new()).unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("/v3/global/products"));
        assert!(!err.to_string().contains("clientId"));
    }

    #[tokio::test]
    async fn get_item_matches_request_with_joined_path() {
        let stub = StubTransport::new(200, r#"{"statusCode":200,"response":{"id":7}}"#);
        let client = CommonSenseClient::with_transport(config(), stub.clone());

        let via_item = client.get_item("blogs", 7, &QueryOptions::new()).await.unwrap();
        let via_request = client.request("blogs/7", &QueryOptions::new()).await.unwrap();

        assert_eq!(via_item.url, via_request.url);
        assert_eq!(via_item.query, via_request.query);
        assert_eq!(stub.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_list_matches_request() {
        let stub = StubTransport::new(200, r#"{"statusCode":200,"count":0,"response":[]}"#);
        let client = CommonSenseClient::with_transport(config(), stub);
        let options = QueryOptions::new().with_limit(3);

        let via_list = client.get_list("boards", &options).await.unwrap();
        let via_request = client.request("boards", &options).await.unwrap();
        assert_eq!(via_list.url, via_request.url);
    }

    #[test]
    fn facades_get_their_platform_and_share_config() {
        let client = client();
        let education = client.education();
        let media = client.media();
        assert_eq!(education.platform(), Platform::Education);
        assert_eq!(media.platform(), Platform::Media);
        assert_eq!(education.version(), 3);
        assert_eq!(media.version(), 3);
        assert_eq!(education.client().config(), client.config());
        assert_eq!(client.platform(), Platform::Global);
    }
}
