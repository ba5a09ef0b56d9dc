//! Local input checks run before any request is built.
//!
//! Plain functions over borrowed inputs. Each returns the first rule that
//! fails; callers chain them with `?` in the order the checks must run.

use crate::context::{ClientContext, RequestAuthor};
use crate::error::ValidationError;
use crate::types::{
    DuplicateSearchRequest, SearchAttribute, SuspiciousIdentityChangeRequest,
    SuspiciousIdentityExcludeRequest, SuspiciousIdentityLockRequest, SuspiciousIdentitySearchRequest,
};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Fails with `BlankField { field }` when `value` is empty or whitespace.
pub fn require_non_blank(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::BlankField { field });
    }
    Ok(())
}

pub fn check_author(author: Option<&RequestAuthor>) -> Result<&RequestAuthor, ValidationError> {
    let author = author.ok_or(ValidationError::MissingAuthor)?;
    if is_blank(&author.name) {
        return Err(ValidationError::BlankAuthorName);
    }
    Ok(author)
}

/// Author first, then client code. Header construction reads both, so the
/// author must be known good before anything else is looked at.
pub fn check_context(context: &ClientContext) -> Result<&RequestAuthor, ValidationError> {
    let author = check_author(context.author.as_ref())?;
    require_non_blank(&context.client_code, "client_code")?;
    Ok(author)
}

fn check_attributes(attributes: &[SearchAttribute]) -> Result<(), ValidationError> {
    attributes
        .iter()
        .try_for_each(|attribute| require_non_blank(&attribute.key, "attributes.key"))
}

pub fn check_suspicious_identity_change(
    request: &SuspiciousIdentityChangeRequest,
) -> Result<(), ValidationError> {
    let identity = request
        .suspicious_identity
        .as_ref()
        .ok_or(ValidationError::MissingField {
            field: "suspicious_identity",
        })?;
    require_non_blank(&identity.customer_id, "customer_id")
}

pub fn check_suspicious_identity_search(
    request: &SuspiciousIdentitySearchRequest,
) -> Result<(), ValidationError> {
    require_non_blank(&request.rule_code, "rule_code")?;
    check_attributes(&request.attributes)
}

pub fn check_duplicate_search(request: &DuplicateSearchRequest) -> Result<(), ValidationError> {
    if request.attributes.is_empty() && request.rule_codes.is_empty() {
        return Err(ValidationError::EmptyDuplicateSearch);
    }
    check_attributes(&request.attributes)?;
    request
        .rule_codes
        .iter()
        .try_for_each(|code| require_non_blank(code, "rule_codes"))
}

pub fn check_exclusion(request: &SuspiciousIdentityExcludeRequest) -> Result<(), ValidationError> {
    require_non_blank(&request.identity_cuid_1, "identity_cuid_1")?;
    require_non_blank(&request.identity_cuid_2, "identity_cuid_2")?;
    if request.identity_cuid_1 == request.identity_cuid_2 {
        return Err(ValidationError::IdenticalCuids(request.identity_cuid_1.clone()));
    }
    let rule_code = request
        .rule_code
        .as_deref()
        .ok_or(ValidationError::MissingField { field: "rule_code" })?;
    require_non_blank(rule_code, "rule_code")
}

pub fn check_lock(request: &SuspiciousIdentityLockRequest) -> Result<(), ValidationError> {
    require_non_blank(&request.customer_id, "customer_id")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AuthorType;
    use crate::types::SuspiciousIdentity;

    fn author() -> RequestAuthor {
        RequestAuthor::new("jdoe", AuthorType::Agent)
    }

    #[test]
    fn missing_author_is_reported_before_blank_client_code() {
        let context = ClientContext::anonymous("  ");
        assert_eq!(check_context(&context), Err(ValidationError::MissingAuthor));
    }

    #[test]
    fn blank_author_name_is_rejected() {
        let context = ClientContext::new("APP1", RequestAuthor::new(" ", AuthorType::Admin));
        assert_eq!(check_context(&context), Err(ValidationError::BlankAuthorName));
    }

    #[test]
    fn blank_client_code_is_rejected() {
        let context = ClientContext::new("", author());
        assert_eq!(
            check_context(&context),
            Err(ValidationError::BlankField { field: "client_code" })
        );
    }

    #[test]
    fn change_request_needs_embedded_identity() {
        let request = SuspiciousIdentityChangeRequest::default();
        assert_eq!(
            check_suspicious_identity_change(&request),
            Err(ValidationError::MissingField {
                field: "suspicious_identity"
            })
        );

        let request = SuspiciousIdentityChangeRequest::new(SuspiciousIdentity::new("\t", "R1"));
        assert_eq!(
            check_suspicious_identity_change(&request),
            Err(ValidationError::BlankField { field: "customer_id" })
        );
    }

    #[test]
    fn search_rejects_blank_attribute_key() {
        let request = SuspiciousIdentitySearchRequest::new("R1").attribute("", "x");
        assert_eq!(
            check_suspicious_identity_search(&request),
            Err(ValidationError::BlankField {
                field: "attributes.key"
            })
        );
    }

    #[test]
    fn duplicate_search_needs_some_criterion() {
        let request = DuplicateSearchRequest::default();
        assert_eq!(
            check_duplicate_search(&request),
            Err(ValidationError::EmptyDuplicateSearch)
        );
        assert!(check_duplicate_search(&DuplicateSearchRequest::default().rule_code("R1")).is_ok());
        assert!(
            check_duplicate_search(&DuplicateSearchRequest::default().attribute("email", "a@b.c"))
                .is_ok()
        );
    }

    #[test]
    fn exclusion_rejects_identical_cuids() {
        let request = SuspiciousIdentityExcludeRequest::new("CID1", "CID1", "R1");
        assert_eq!(
            check_exclusion(&request),
            Err(ValidationError::IdenticalCuids("CID1".to_string()))
        );
    }

    #[test]
    fn exclusion_requires_rule_code() {
        let mut request = SuspiciousIdentityExcludeRequest::new("CID1", "CID2", "R1");
        request.rule_code = None;
        assert_eq!(
            check_exclusion(&request),
            Err(ValidationError::MissingField { field: "rule_code" })
        );
        request.rule_code = Some(" ".to_string());
        assert_eq!(
            check_exclusion(&request),
            Err(ValidationError::BlankField { field: "rule_code" })
        );
    }

    #[test]
    fn lock_requires_customer_id() {
        let request = SuspiciousIdentityLockRequest {
            customer_id: String::new(),
            locked: true,
        };
        assert_eq!(
            check_lock(&request),
            Err(ValidationError::BlankField { field: "customer_id" })
        );
    }
}
