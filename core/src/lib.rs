//! Synchronous client core for the identity quality service.
//!
//! # Overview
//! Lists duplicate rules, reports and searches suspicious identities, looks
//! up duplicates, and manages exclusions and review locks on a remote
//! identity store. Every operation validates its inputs locally, builds a
//! deterministic `HttpRequest`, and decodes the response into a typed DTO.
//!
//! # Design
//! - `IdentityQualityClient` is stateless: it holds only `base_url`. Each
//!   operation is split into `build_*` (validate and produce a request) and
//!   `parse_*` (consume a response), so the I/O boundary is explicit.
//! - `IdentityQualityService` composes a client with any `HttpTransport`
//!   and runs build, execute, parse in one call. With the default
//!   `blocking` feature, `UreqTransport` provides a ready-made transport.
//! - Errors are split into `ValidationError` (caller input, raised before
//!   any I/O) and `TransportError` (network, status, decoding).
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::IdentityQualityClient;
pub use config::ClientConfig;
pub use context::{AuthorType, ClientContext, PageSpec, RequestAuthor};
pub use error::{ConfigError, Error, Result, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::IdentityQualityService;
pub use transport::HttpTransport;
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
pub use types::{
    DuplicateRuleSummary, DuplicateRuleSummarySearchResponse, DuplicateSearchRequest, DuplicateSearchResponse,
    IdentityAttribute, QualifiedIdentity, ResponsePagination, ResponseStatus, SearchAttribute, SuspiciousIdentity,
    SuspiciousIdentityChangeRequest, SuspiciousIdentityChangeResponse, SuspiciousIdentityExcludeRequest,
    SuspiciousIdentityExcludeResponse, SuspiciousIdentityLock, SuspiciousIdentityLockRequest,
    SuspiciousIdentityLockResponse, SuspiciousIdentitySearchRequest, SuspiciousIdentitySearchResponse,
};
