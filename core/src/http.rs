//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. Whoever executes the request (an `HttpTransport`
//! implementation or the caller itself) owns the actual I/O.
//!
//! Query parameters are kept apart from `path` and left unencoded; encoding
//! is the executor's job. Headers and query pairs are ordered `Vec`s so two
//! builds from the same inputs compare equal field by field.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `IdentityQualityClient::build_*` methods. `path` is the absolute
/// URL without a query string; `query` holds the query pairs in the order
/// they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up the first header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Look up the first query parameter with the given name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to `IdentityQualityClient::parse_*` methods for deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost/v3/quality/rules".to_string(),
            query: vec![("priority".to_string(), "5".to_string())],
            headers: vec![("client-code".to_string(), "APP1".to_string())],
            body: None,
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        assert_eq!(request().header("Client-Code"), Some("APP1"));
        assert_eq!(request().header("author-name"), None);
    }

    #[test]
    fn query_lookup_is_exact() {
        assert_eq!(request().query_param("priority"), Some("5"));
        assert_eq!(request().query_param("Priority"), None);
    }

    #[test]
    fn success_range_covers_2xx_only() {
        let mut response = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 299;
        assert!(response.is_success());
        response.status = 300;
        assert!(!response.is_success());
        response.status = 199;
        assert!(!response.is_success());
    }

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
    }
}
