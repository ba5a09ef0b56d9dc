//! Stateless request builder and response parser for the identity quality API.
//!
//! # Design
//! `IdentityQualityClient` holds only a `base_url` and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! validates its inputs and produces an `HttpRequest`, and a `parse_*` method
//! that consumes an `HttpResponse`. Nothing here touches the network, so a
//! rejected input can never cause a request to go out.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::{ClientContext, PageSpec, RequestAuthor};
use crate::error::{Result, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    DuplicateRuleSummarySearchResponse, DuplicateSearchRequest, DuplicateSearchResponse,
    SuspiciousIdentityChangeRequest, SuspiciousIdentityChangeResponse, SuspiciousIdentityExcludeRequest,
    SuspiciousIdentityExcludeResponse, SuspiciousIdentityLockRequest, SuspiciousIdentityLockResponse,
    SuspiciousIdentitySearchRequest, SuspiciousIdentitySearchResponse,
};
use crate::validate;

pub const HEADER_CLIENT_CODE: &str = "client-code";
pub const HEADER_AUTHOR_NAME: &str = "author-name";
pub const HEADER_AUTHOR_TYPE: &str = "author-type";

pub const PARAM_PRIORITY: &str = "priority";
pub const PARAM_RULE_CODE: &str = "rule_code";

const QUALITY_PATH: &str = "/v3/quality";
const RULES_PATH: &str = "/rules";
const SUSPICIONS_PATH: &str = "/suspicions";
const SEARCH_PATH: &str = "/search";
const DUPLICATE_PATH: &str = "/duplicate";
const EXCLUSION_PATH: &str = "/exclusion";
const CANCEL_PATH: &str = "/cancel";
const LOCK_PATH: &str = "/lock";

/// Synchronous, stateless client for the identity quality API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. See `IdentityQualityService` for the variant that
/// also drives a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityQualityClient {
    base_url: String,
}

impl IdentityQualityClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List duplicate rules, optionally only those at or above `min_priority`.
    pub fn build_get_all_duplicate_rules(
        &self,
        context: &ClientContext,
        min_priority: Option<i32>,
    ) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        debug!(client_code = %context.client_code, ?min_priority, "get duplicate rules");

        let mut query = Vec::new();
        if let Some(priority) = min_priority {
            query.push((PARAM_PRIORITY.to_string(), priority.to_string()));
        }
        Ok(self.request(HttpMethod::Get, RULES_PATH, query, context, author, None))
    }

    /// Report an identity as a suspected duplicate.
    pub fn build_create_suspicious_identity(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentityChangeRequest,
    ) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        validate::check_suspicious_identity_change(request)?;
        debug!(
            client_code = %context.client_code,
            customer_id = request.suspicious_identity.as_ref().map(|s| s.customer_id.as_str()),
            "create suspicious identity"
        );

        let body = to_json(request)?;
        Ok(self.request(HttpMethod::Post, SUSPICIONS_PATH, Vec::new(), context, author, Some(body)))
    }

    pub fn build_search_suspicious_identities(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentitySearchRequest,
        page: &PageSpec,
    ) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        validate::check_suspicious_identity_search(request)?;
        debug!(
            client_code = %context.client_code,
            rule_code = %request.rule_code,
            attributes = ?request.attributes,
            max = page.max,
            page = ?page.page,
            size = ?page.size,
            "search suspicious identities"
        );

        let body = to_json(request)?;
        let path = format!("{SUSPICIONS_PATH}{SEARCH_PATH}");
        Ok(self.request(HttpMethod::Post, &path, page.query_pairs(), context, author, Some(body)))
    }

    /// List every suspicious identity, optionally restricted to rules at or
    /// above `min_priority`.
    pub fn build_get_all_suspicious_identities(
        &self,
        context: &ClientContext,
        page: &PageSpec,
        min_priority: Option<i32>,
    ) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        debug!(
            client_code = %context.client_code,
            max = page.max,
            page = ?page.page,
            size = ?page.size,
            ?min_priority,
            "get all suspicious identities"
        );

        let mut query = page.query_pairs();
        if let Some(priority) = min_priority {
            query.push((PARAM_PRIORITY.to_string(), priority.to_string()));
        }
        Ok(self.request(HttpMethod::Get, SUSPICIONS_PATH, query, context, author, None))
    }

    /// Identities that `rule_code` flags as duplicates of `customer_id`.
    pub fn build_get_duplicates(
        &self,
        context: &ClientContext,
        customer_id: &str,
        rule_code: &str,
        page: Option<&PageSpec>,
    ) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        validate::require_non_blank(customer_id, "customer_id")?;
        validate::require_non_blank(rule_code, "rule_code")?;
        debug!(
            client_code = %context.client_code,
            customer_id,
            rule_code,
            page = ?page,
            "get duplicates"
        );

        let mut query = vec![(PARAM_RULE_CODE.to_string(), rule_code.to_string())];
        if let Some(page) = page {
            query.extend(page.query_pairs());
        }
        let path = format!("{DUPLICATE_PATH}/{}", urlencoding::encode(customer_id));
        Ok(self.request(HttpMethod::Get, &path, query, context, author, None))
    }

    pub fn build_search_duplicates(
        &self,
        context: &ClientContext,
        request: &DuplicateSearchRequest,
    ) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        validate::check_duplicate_search(request)?;
        debug!(
            client_code = %context.client_code,
            attributes = ?request.attributes,
            rule_codes = ?request.rule_codes,
            "search duplicates"
        );

        let body = to_json(request)?;
        let path = format!("{DUPLICATE_PATH}{SEARCH_PATH}");
        Ok(self.request(HttpMethod::Post, &path, Vec::new(), context, author, Some(body)))
    }

    /// Mark two identities as not being duplicates of each other.
    pub fn build_exclude_identities(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentityExcludeRequest,
    ) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        validate::check_exclusion(request)?;
        debug!(
            client_code = %context.client_code,
            cuid1 = %request.identity_cuid_1,
            cuid2 = %request.identity_cuid_2,
            rule_code = request.rule_code.as_deref(),
            "exclude identities"
        );

        let body = to_json(request)?;
        Ok(self.request(HttpMethod::Put, EXCLUSION_PATH, Vec::new(), context, author, Some(body)))
    }

    pub fn build_cancel_identities_exclusion(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentityExcludeRequest,
    ) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        validate::check_exclusion(request)?;
        debug!(
            client_code = %context.client_code,
            cuid1 = %request.identity_cuid_1,
            cuid2 = %request.identity_cuid_2,
            rule_code = request.rule_code.as_deref(),
            "cancel identities exclusion"
        );

        let body = to_json(request)?;
        let path = format!("{EXCLUSION_PATH}{CANCEL_PATH}");
        Ok(self.request(HttpMethod::Post, &path, Vec::new(), context, author, Some(body)))
    }

    /// Take or release the review lock on a suspicion.
    pub fn build_lock(&self, context: &ClientContext, request: &SuspiciousIdentityLockRequest) -> Result<HttpRequest> {
        let author = validate::check_context(context)?;
        validate::check_lock(request)?;
        debug!(
            client_code = %context.client_code,
            customer_id = %request.customer_id,
            locked = request.locked,
            "lock suspicious identity"
        );

        let body = to_json(request)?;
        Ok(self.request(HttpMethod::Post, LOCK_PATH, Vec::new(), context, author, Some(body)))
    }

    pub fn parse_get_all_duplicate_rules(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<DuplicateRuleSummarySearchResponse, TransportError> {
        decode(response)
    }

    pub fn parse_create_suspicious_identity(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<SuspiciousIdentityChangeResponse, TransportError> {
        decode(response)
    }

    pub fn parse_search_suspicious_identities(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<SuspiciousIdentitySearchResponse, TransportError> {
        decode(response)
    }

    pub fn parse_get_all_suspicious_identities(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<SuspiciousIdentitySearchResponse, TransportError> {
        decode(response)
    }

    pub fn parse_get_duplicates(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<DuplicateSearchResponse, TransportError> {
        decode(response)
    }

    pub fn parse_search_duplicates(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<DuplicateSearchResponse, TransportError> {
        decode(response)
    }

    pub fn parse_exclude_identities(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<SuspiciousIdentityExcludeResponse, TransportError> {
        decode(response)
    }

    pub fn parse_cancel_identities_exclusion(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<SuspiciousIdentityExcludeResponse, TransportError> {
        decode(response)
    }

    pub fn parse_lock(
        &self,
        response: HttpResponse,
    ) -> std::result::Result<SuspiciousIdentityLockResponse, TransportError> {
        decode(response)
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        context: &ClientContext,
        author: &RequestAuthor,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = vec![
            (HEADER_CLIENT_CODE.to_string(), context.client_code.clone()),
            (HEADER_AUTHOR_NAME.to_string(), author.name.clone()),
            (HEADER_AUTHOR_TYPE.to_string(), author.author_type.as_str().to_string()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: format!("{}{QUALITY_PATH}{path}", self.base_url),
            query,
            headers,
            body,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> std::result::Result<String, TransportError> {
    serde_json::to_string(value).map_err(|e| TransportError::Serialization(e.to_string()))
}

/// Accept any 2xx status and decode the body; anything else is a `Status` error.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> std::result::Result<T, TransportError> {
    if !response.is_success() {
        warn!(status = response.status, "identity quality service returned an error status");
        return Err(TransportError::Status {
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| TransportError::Deserialization(e.to_string()))
}
