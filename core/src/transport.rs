//! The seam between request building and actual I/O.
//!
//! Any HTTP library can sit behind `HttpTransport`. Implementations return
//! non-2xx responses as data so status interpretation stays in the client's
//! `parse_*` methods; only failures to get a response at all are errors here.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes an `HttpRequest` and returns whatever the server answered.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "blocking")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "blocking")]
mod blocking {
    use std::time::Duration;

    use tracing::debug;

    use super::HttpTransport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
    /// responses come back as `HttpResponse` values.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new(timeout: Option<Duration>) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new(None)
        }
    }

    fn prepare<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
        for (name, value) in &request.query {
            builder = builder.query(name, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    fn map_error(err: ureq::Error) -> TransportError {
        match err {
            ureq::Error::Timeout(timeout) => TransportError::Timeout(timeout.to_string()),
            other => TransportError::Network(other.to_string()),
        }
    }

    impl HttpTransport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            debug!(method = %request.method, path = %request.path, "sending request");

            let body = request.body.as_deref().unwrap_or_default().as_bytes();
            let result = match request.method {
                HttpMethod::Get => prepare(self.agent.get(&request.path), request).call(),
                HttpMethod::Post => prepare(self.agent.post(&request.path), request).send(body),
                HttpMethod::Put => prepare(self.agent.put(&request.path), request).send(body),
            };
            let mut response = result.map_err(map_error)?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.body_mut().read_to_string().map_err(map_error)?;

            debug!(status, "received response");
            Ok(HttpResponse { status, headers, body })
        }
    }
}
