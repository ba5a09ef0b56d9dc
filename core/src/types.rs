//! Request and response DTOs for the identity quality API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates. Response types are
//! passed back to the caller exactly as decoded. Collections default to
//! empty so a service omitting them still decodes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Outcome block carried by every response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResponseStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_key: Option<String>,
}

/// One criterion of a search: an attribute key and the value to match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchAttribute {
    pub key: String,
    pub value: String,
}

impl SearchAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuplicateRuleSummary {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: i32,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuplicateRuleSummarySearchResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub duplicate_rule_summaries: Vec<DuplicateRuleSummary>,
}

/// Lock held on a suspicion while someone is reviewing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentityLock {
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SuspiciousIdentity {
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplication_rule_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<SuspiciousIdentityLock>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl SuspiciousIdentity {
    pub fn new(customer_id: impl Into<String>, rule_code: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            duplication_rule_code: Some(rule_code.into()),
            ..Self::default()
        }
    }
}

/// Report of a new suspicious identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SuspiciousIdentityChangeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspicious_identity: Option<SuspiciousIdentity>,
}

impl SuspiciousIdentityChangeRequest {
    pub fn new(suspicious_identity: SuspiciousIdentity) -> Self {
        Self {
            suspicious_identity: Some(suspicious_identity),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentityChangeResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspicious_identity: Option<SuspiciousIdentity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentitySearchRequest {
    pub rule_code: String,
    #[serde(default)]
    pub attributes: Vec<SearchAttribute>,
}

impl SuspiciousIdentitySearchRequest {
    pub fn new(rule_code: impl Into<String>) -> Self {
        Self {
            rule_code: rule_code.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(SearchAttribute::new(key, value));
        self
    }
}

/// Paging block returned by list and search endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponsePagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_records: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentitySearchResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub suspicious_identities: Vec<SuspiciousIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<ResponsePagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityAttribute {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifier: Option<String>,
}

/// An identity matched by a duplicate rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualifiedIdentity {
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    #[serde(default)]
    pub attributes: Vec<IdentityAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DuplicateSearchRequest {
    #[serde(default)]
    pub attributes: Vec<SearchAttribute>,
    #[serde(default)]
    pub rule_codes: BTreeSet<String>,
}

impl DuplicateSearchRequest {
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(SearchAttribute::new(key, value));
        self
    }

    pub fn rule_code(mut self, code: impl Into<String>) -> Self {
        self.rule_codes.insert(code.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuplicateSearchResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub identities: Vec<QualifiedIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<ResponsePagination>,
}

/// Marks two identities as "not duplicates" for a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentityExcludeRequest {
    pub identity_cuid_1: String,
    pub identity_cuid_2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_code: Option<String>,
}

impl SuspiciousIdentityExcludeRequest {
    pub fn new(
        cuid1: impl Into<String>,
        cuid2: impl Into<String>,
        rule_code: impl Into<String>,
    ) -> Self {
        Self {
            identity_cuid_1: cuid1.into(),
            identity_cuid_2: cuid2.into(),
            rule_code: Some(rule_code.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentityExcludeResponse {
    pub status: ResponseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentityLockRequest {
    pub customer_id: String,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentityLockResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}
