//! One call per logical action: build, execute, parse.
//!
//! `IdentityQualityService` owns an `IdentityQualityClient` and a transport.
//! Validation happens inside `build_*`, so a rejected input returns before
//! the transport is ever asked to do anything.

use crate::client::IdentityQualityClient;
use crate::context::{ClientContext, PageSpec};
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::HttpTransport;
use crate::types::{
    DuplicateRuleSummarySearchResponse, DuplicateSearchRequest, DuplicateSearchResponse,
    SuspiciousIdentityChangeRequest, SuspiciousIdentityChangeResponse, SuspiciousIdentityExcludeRequest,
    SuspiciousIdentityExcludeResponse, SuspiciousIdentityLockRequest, SuspiciousIdentityLockResponse,
    SuspiciousIdentitySearchRequest, SuspiciousIdentitySearchResponse,
};

#[derive(Debug, Clone)]
pub struct IdentityQualityService<T> {
    client: IdentityQualityClient,
    transport: T,
}

#[cfg(feature = "blocking")]
impl IdentityQualityService<crate::transport::UreqTransport> {
    /// Service talking to `config.endpoint` through a blocking ureq agent.
    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        Self::new(
            IdentityQualityClient::new(&config.endpoint),
            crate::transport::UreqTransport::new(config.timeout),
        )
    }
}

impl<T: HttpTransport> IdentityQualityService<T> {
    pub fn new(client: IdentityQualityClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &IdentityQualityClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.transport.execute(&request)?)
    }

    pub fn get_all_duplicate_rules(
        &self,
        context: &ClientContext,
        min_priority: Option<i32>,
    ) -> Result<DuplicateRuleSummarySearchResponse> {
        let request = self.client.build_get_all_duplicate_rules(context, min_priority)?;
        let response = self.send(request)?;
        Ok(self.client.parse_get_all_duplicate_rules(response)?)
    }

    pub fn create_suspicious_identity(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentityChangeRequest,
    ) -> Result<SuspiciousIdentityChangeResponse> {
        let request = self.client.build_create_suspicious_identity(context, request)?;
        let response = self.send(request)?;
        Ok(self.client.parse_create_suspicious_identity(response)?)
    }

    pub fn search_suspicious_identities(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentitySearchRequest,
        page: &PageSpec,
    ) -> Result<SuspiciousIdentitySearchResponse> {
        let request = self
            .client
            .build_search_suspicious_identities(context, request, page)?;
        let response = self.send(request)?;
        Ok(self.client.parse_search_suspicious_identities(response)?)
    }

    pub fn get_all_suspicious_identities(
        &self,
        context: &ClientContext,
        page: &PageSpec,
        min_priority: Option<i32>,
    ) -> Result<SuspiciousIdentitySearchResponse> {
        let request = self
            .client
            .build_get_all_suspicious_identities(context, page, min_priority)?;
        let response = self.send(request)?;
        Ok(self.client.parse_get_all_suspicious_identities(response)?)
    }

    pub fn get_duplicates(
        &self,
        context: &ClientContext,
        customer_id: &str,
        rule_code: &str,
        page: Option<&PageSpec>,
    ) -> Result<DuplicateSearchResponse> {
        let request = self
            .client
            .build_get_duplicates(context, customer_id, rule_code, page)?;
        let response = self.send(request)?;
        Ok(self.client.parse_get_duplicates(response)?)
    }

    pub fn search_duplicates(
        &self,
        context: &ClientContext,
        request: &DuplicateSearchRequest,
    ) -> Result<DuplicateSearchResponse> {
        let request = self.client.build_search_duplicates(context, request)?;
        let response = self.send(request)?;
        Ok(self.client.parse_search_duplicates(response)?)
    }

    pub fn exclude_identities(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentityExcludeRequest,
    ) -> Result<SuspiciousIdentityExcludeResponse> {
        let request = self.client.build_exclude_identities(context, request)?;
        let response = self.send(request)?;
        Ok(self.client.parse_exclude_identities(response)?)
    }

    pub fn cancel_identities_exclusion(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentityExcludeRequest,
    ) -> Result<SuspiciousIdentityExcludeResponse> {
        let request = self
            .client
            .build_cancel_identities_exclusion(context, request)?;
        let response = self.send(request)?;
        Ok(self.client.parse_cancel_identities_exclusion(response)?)
    }

    pub fn lock(
        &self,
        context: &ClientContext,
        request: &SuspiciousIdentityLockRequest,
    ) -> Result<SuspiciousIdentityLockResponse> {
        let request = self.client.build_lock(context, request)?;
        let response = self.send(request)?;
        Ok(self.client.parse_lock(response)?)
    }
}
