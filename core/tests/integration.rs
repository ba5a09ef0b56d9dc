//! Full suspicion lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every service
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building, the transport and response parsing agree with the server.

use std::time::Duration;

use identityquality_core::{
    AuthorType, ClientConfig, ClientContext, DuplicateSearchRequest, Error, IdentityQualityService, PageSpec,
    RequestAuthor, SuspiciousIdentity, SuspiciousIdentityChangeRequest, SuspiciousIdentityExcludeRequest,
    SuspiciousIdentityLockRequest, SuspiciousIdentitySearchRequest, TransportError, UreqTransport,
};

const STRICT: &str = "RG_GEN_StrictDoublon_01";

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn service(base_url: &str) -> IdentityQualityService<UreqTransport> {
    let config = ClientConfig::new(base_url).with_timeout(Duration::from_secs(10));
    IdentityQualityService::from_config(&config)
}

fn context() -> ClientContext {
    ClientContext::new("APP1", RequestAuthor::new("jdoe", AuthorType::Agent))
}

fn lock_request(cuid: &str, locked: bool) -> SuspiciousIdentityLockRequest {
    SuspiciousIdentityLockRequest {
        customer_id: cuid.to_string(),
        locked,
    }
}

#[test]
fn suspicion_lifecycle() {
    // Step 1: start mock server on a random port.
    let service = service(&start_server());
    let ctx = context();

    // Step 2: rules, with and without a priority floor.
    let rules = service.get_all_duplicate_rules(&ctx, None).unwrap();
    assert_eq!(rules.duplicate_rule_summaries.len(), 2);
    let rules = service.get_all_duplicate_rules(&ctx, Some(5)).unwrap();
    assert_eq!(rules.duplicate_rule_summaries.len(), 1);
    assert_eq!(rules.duplicate_rule_summaries[0].code, STRICT);

    // Step 3: report two identities under the strict rule.
    for cuid in ["CID1", "CID2"] {
        let mut identity = SuspiciousIdentity::new(cuid, STRICT);
        identity
            .metadata
            .insert("family_name".to_string(), "Durand".to_string());
        let created = service
            .create_suspicious_identity(&ctx, &SuspiciousIdentityChangeRequest::new(identity))
            .unwrap();
        assert_eq!(created.status.status, "SUCCESS");
        assert_eq!(created.suspicious_identity.unwrap().customer_id, cuid);
    }

    // Step 4: reporting again is rejected by the server as a transport-level failure.
    let err = service
        .create_suspicious_identity(
            &ctx,
            &SuspiciousIdentityChangeRequest::new(SuspiciousIdentity::new("CID1", STRICT)),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Status { status: 409, .. })
    ));

    // Step 5: search by rule, paged.
    let found = service
        .search_suspicious_identities(
            &ctx,
            &SuspiciousIdentitySearchRequest::new(STRICT),
            &PageSpec::new(10).with_page(1, 1),
        )
        .unwrap();
    assert_eq!(found.suspicious_identities.len(), 1);
    assert_eq!(found.pagination.unwrap().total_records, 2);

    // Step 6: list everything above priority 5.
    let all = service
        .get_all_suspicious_identities(&ctx, &PageSpec::new(100), Some(5))
        .unwrap();
    assert_eq!(all.suspicious_identities.len(), 2);

    // Step 7: CID2 is a duplicate of CID1.
    let duplicates = service.get_duplicates(&ctx, "CID1", STRICT, None).unwrap();
    assert_eq!(duplicates.identities.len(), 1);
    assert_eq!(duplicates.identities[0].customer_id, "CID2");

    // Step 8: search duplicates by attribute.
    let matches = service
        .search_duplicates(
            &ctx,
            &DuplicateSearchRequest::default()
                .attribute("family_name", "Durand")
                .rule_code(STRICT),
        )
        .unwrap();
    assert_eq!(matches.identities.len(), 2);

    // Step 9: exclude the pair, duplicates disappear.
    let exclusion = SuspiciousIdentityExcludeRequest::new("CID1", "CID2", STRICT);
    service.exclude_identities(&ctx, &exclusion).unwrap();
    let duplicates = service.get_duplicates(&ctx, "CID1", STRICT, None).unwrap();
    assert!(duplicates.identities.is_empty());

    // Step 10: cancel the exclusion, duplicates come back.
    service.cancel_identities_exclusion(&ctx, &exclusion).unwrap();
    let duplicates = service
        .get_duplicates(&ctx, "CID1", STRICT, Some(&PageSpec::new(10)))
        .unwrap();
    assert_eq!(duplicates.identities.len(), 1);

    // Step 11: lock, then another author is refused, then release.
    let locked = service.lock(&ctx, &lock_request("CID1", true)).unwrap();
    assert_eq!(locked.locked, Some(true));

    let other = ClientContext::new("APP2", RequestAuthor::new("asmith", AuthorType::Admin));
    let err = service.lock(&other, &lock_request("CID1", true)).unwrap_err();
    assert!(err.is_transport());

    let released = service.lock(&ctx, &lock_request("CID1", false)).unwrap();
    assert_eq!(released.locked, Some(false));
    service.lock(&other, &lock_request("CID1", true)).unwrap();
}

#[test]
fn reported_id_with_reserved_characters_can_be_looked_up() {
    let service = service(&start_server());
    let ctx = context();
    let cuid = "CID 9/x?y";

    service
        .create_suspicious_identity(
            &ctx,
            &SuspiciousIdentityChangeRequest::new(SuspiciousIdentity::new(cuid, STRICT)),
        )
        .unwrap();

    // The server answers 404 for an id it does not know, so success means the
    // segment arrived decoded and intact.
    let duplicates = service.get_duplicates(&ctx, cuid, STRICT, None).unwrap();
    assert!(duplicates.identities.is_empty());
}

#[test]
fn validation_errors_are_raised_before_any_io() {
    // Nothing listens here; a request that went out would fail as Network.
    let service = service("http://127.0.0.1:9");
    let err = service
        .get_all_duplicate_rules(&ClientContext::anonymous("APP1"), None)
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn unreachable_service_is_a_transport_error() {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    drop(std_listener);

    let service = service(&format!("http://{addr}"));
    let err = service.get_all_duplicate_rules(&context(), None).unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Network(_))));
}
