use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseStatus {
    pub status: String,
    pub http_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseStatus {
    fn of(code: StatusCode, message: Option<String>) -> Self {
        let status = if code.is_success() {
            "SUCCESS".to_string()
        } else {
            code.canonical_reason()
                .unwrap_or("ERROR")
                .to_uppercase()
                .replace(' ', "_")
        };
        Self {
            status,
            http_code: code.as_u16(),
            message,
        }
    }

    fn ok() -> Self {
        Self::of(StatusCode::OK, None)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DuplicateRule {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub priority: i32,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleSummary {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: i32,
    pub active: bool,
    pub duplicate_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lock {
    pub locked: bool,
    pub author_name: String,
    pub author_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuspiciousIdentity {
    pub customer_id: String,
    pub duplication_rule_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<Lock>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct ChangeRequest {
    pub suspicious_identity: Option<SuspiciousIdentity>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Deserialize)]
pub struct SuspicionSearchRequest {
    pub rule_code: String,
    #[serde(default)]
    pub attributes: Vec<SearchAttribute>,
}

#[derive(Deserialize)]
pub struct DuplicateSearchRequest {
    #[serde(default)]
    pub attributes: Vec<SearchAttribute>,
    #[serde(default)]
    pub rule_codes: Vec<String>,
}

#[derive(Deserialize)]
pub struct ExcludeRequest {
    pub identity_cuid_1: String,
    pub identity_cuid_2: String,
    pub rule_code: Option<String>,
}

#[derive(Deserialize)]
pub struct LockRequest {
    pub customer_id: String,
    pub locked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_records: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentityAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualifiedIdentity {
    pub customer_id: String,
    pub quality: f64,
    pub attributes: Vec<IdentityAttribute>,
}

#[derive(Serialize, Deserialize)]
pub struct RulesResponse {
    pub status: ResponseStatus,
    pub duplicate_rule_summaries: Vec<RuleSummary>,
}

#[derive(Serialize, Deserialize)]
pub struct ChangeResponse {
    pub status: ResponseStatus,
    pub suspicious_identity: SuspiciousIdentity,
}

#[derive(Serialize, Deserialize)]
pub struct SuspicionsResponse {
    pub status: ResponseStatus,
    pub suspicious_identities: Vec<SuspiciousIdentity>,
    pub pagination: Pagination,
}

#[derive(Serialize, Deserialize)]
pub struct DuplicatesResponse {
    pub status: ResponseStatus,
    pub identities: Vec<QualifiedIdentity>,
}

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ResponseStatus,
}

#[derive(Serialize, Deserialize)]
pub struct LockResponse {
    pub status: ResponseStatus,
    pub locked: bool,
}

#[derive(Default, Deserialize)]
pub struct ListQuery {
    pub max: Option<u32>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub priority: Option<i32>,
    pub rule_code: Option<String>,
}

/// Exclusion key: rule code plus the two cuids in sorted order.
pub type ExclusionKey = (String, String, String);

fn exclusion_key(rule_code: &str, a: &str, b: &str) -> ExclusionKey {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    (rule_code.to_string(), first.to_string(), second.to_string())
}

#[derive(Debug, Default)]
pub struct Store {
    pub rules: Vec<DuplicateRule>,
    pub suspicions: BTreeMap<String, SuspiciousIdentity>,
    pub exclusions: BTreeSet<ExclusionKey>,
}

impl Store {
    pub fn seeded() -> Self {
        Self {
            rules: vec![
                DuplicateRule {
                    code: "RG_GEN_StrictDoublon_01".to_string(),
                    name: "Strict duplicates".to_string(),
                    description: Some("Same names, birth date and birth place".to_string()),
                    priority: 10,
                    active: true,
                },
                DuplicateRule {
                    code: "RG_GEN_SuspectDoublon_02".to_string(),
                    name: "Suspected duplicates".to_string(),
                    description: None,
                    priority: 1,
                    active: true,
                },
            ],
            ..Self::default()
        }
    }

    fn rule(&self, code: &str) -> Result<&DuplicateRule, ApiError> {
        self.rules
            .iter()
            .find(|rule| rule.code == code)
            .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("unknown rule {code}")))
    }

    fn priority_of(&self, suspicion: &SuspiciousIdentity) -> Option<i32> {
        let code = suspicion.duplication_rule_code.as_deref()?;
        self.rules.iter().find(|r| r.code == code).map(|r| r.priority)
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug)]
pub struct ApiError {
    code: StatusCode,
    message: String,
}

impl ApiError {
    fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(code = self.code.as_u16(), message = %self.message, "rejecting request");
        let body = StatusResponse {
            status: ResponseStatus::of(self.code, Some(self.message)),
        };
        (self.code, Json(body)).into_response()
    }
}

/// The caller as described by the mandatory identification headers.
struct Caller {
    client_code: String,
    author_name: String,
    author_type: String,
}

fn caller(headers: &HeaderMap) -> Result<Caller, ApiError> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, format!("missing {name} header")))
    };
    Ok(Caller {
        client_code: read("client-code")?,
        author_name: read("author-name")?,
        author_type: read("author-type")?,
    })
}

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/v3/quality/rules", get(list_rules))
        .route("/v3/quality/suspicions", get(list_suspicions).post(create_suspicion))
        .route("/v3/quality/suspicions/search", post(search_suspicions))
        .route("/v3/quality/duplicate/search", post(search_duplicates))
        .route("/v3/quality/duplicate/{customer_id}", get(get_duplicates))
        .route("/v3/quality/exclusion", put(exclude))
        .route("/v3/quality/exclusion/cancel", post(cancel_exclusion))
        .route("/v3/quality/lock", post(lock))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "identity quality mock listening");
    }
    axum::serve(listener, app()).await
}

/// Slice `items` according to `max`, `page` (1-based) and `size`.
fn paginate<T: Clone>(items: &[T], query: &ListQuery) -> (Vec<T>, Pagination) {
    let capped = match query.max {
        Some(max) => &items[..items.len().min(max as usize)],
        None => items,
    };
    let total = capped.len();
    let size = query.size.unwrap_or(total.max(1) as u32).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let start = ((page - 1) as usize).saturating_mul(size as usize).min(total);
    let end = start.saturating_add(size as usize).min(total);
    let pagination = Pagination {
        current_page: page,
        page_size: size,
        total_pages: total.div_ceil(size as usize) as u32,
        total_records: total as u64,
    };
    (capped[start..end].to_vec(), pagination)
}

fn to_qualified(suspicion: &SuspiciousIdentity) -> QualifiedIdentity {
    QualifiedIdentity {
        customer_id: suspicion.customer_id.clone(),
        quality: 1.0,
        attributes: suspicion
            .metadata
            .iter()
            .map(|(key, value)| IdentityAttribute {
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
    }
}

async fn list_rules(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<RulesResponse>, ApiError> {
    let caller = caller(&headers)?;
    debug!(client_code = %caller.client_code, "list rules");
    let store = db.read().await;
    let summaries = store
        .rules
        .iter()
        .filter(|rule| query.priority.is_none_or(|min| rule.priority >= min))
        .map(|rule| RuleSummary {
            code: rule.code.clone(),
            name: rule.name.clone(),
            description: rule.description.clone(),
            priority: rule.priority,
            active: rule.active,
            duplicate_count: store
                .suspicions
                .values()
                .filter(|s| s.duplication_rule_code.as_deref() == Some(rule.code.as_str()))
                .count() as u64,
        })
        .collect();
    Ok(Json(RulesResponse {
        status: ResponseStatus::ok(),
        duplicate_rule_summaries: summaries,
    }))
}

async fn create_suspicion(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ChangeRequest>,
) -> Result<(StatusCode, Json<ChangeResponse>), ApiError> {
    let caller = caller(&headers)?;
    let mut identity = input
        .suspicious_identity
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "suspicious_identity is required"))?;
    let rule_code = identity
        .duplication_rule_code
        .clone()
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "duplication_rule_code is required"))?;

    let mut store = db.write().await;
    store.rule(&rule_code)?;
    if store.suspicions.contains_key(&identity.customer_id) {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("{} is already suspicious", identity.customer_id),
        ));
    }
    debug!(client_code = %caller.client_code, customer_id = %identity.customer_id, "report suspicion");
    identity.lock = None;
    store
        .suspicions
        .insert(identity.customer_id.clone(), identity.clone());
    Ok((
        StatusCode::CREATED,
        Json(ChangeResponse {
            status: ResponseStatus::of(StatusCode::CREATED, None),
            suspicious_identity: identity,
        }),
    ))
}

async fn list_suspicions(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<SuspicionsResponse>, ApiError> {
    caller(&headers)?;
    let store = db.read().await;
    let matching: Vec<SuspiciousIdentity> = store
        .suspicions
        .values()
        .filter(|s| match query.priority {
            Some(min) => store.priority_of(s).is_some_and(|p| p >= min),
            None => true,
        })
        .cloned()
        .collect();
    let (page, pagination) = paginate(&matching, &query);
    Ok(Json(SuspicionsResponse {
        status: ResponseStatus::ok(),
        suspicious_identities: page,
        pagination,
    }))
}

/// Attributes are accepted but not matched; the mock filters by rule only.
async fn search_suspicions(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
    Json(input): Json<SuspicionSearchRequest>,
) -> Result<Json<SuspicionsResponse>, ApiError> {
    caller(&headers)?;
    debug!(rule_code = %input.rule_code, attributes = input.attributes.len(), "search suspicions");
    let store = db.read().await;
    store.rule(&input.rule_code)?;
    let matching: Vec<SuspiciousIdentity> = store
        .suspicions
        .values()
        .filter(|s| s.duplication_rule_code.as_deref() == Some(input.rule_code.as_str()))
        .cloned()
        .collect();
    let (page, pagination) = paginate(&matching, &query);
    Ok(Json(SuspicionsResponse {
        status: ResponseStatus::ok(),
        suspicious_identities: page,
        pagination,
    }))
}

async fn get_duplicates(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(customer_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DuplicatesResponse>, ApiError> {
    caller(&headers)?;
    let rule_code = query
        .rule_code
        .clone()
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "rule_code is required"))?;
    let store = db.read().await;
    store.rule(&rule_code)?;
    if !store.suspicions.contains_key(&customer_id) {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("{customer_id} has no suspicion"),
        ));
    }
    let duplicates: Vec<QualifiedIdentity> = store
        .suspicions
        .values()
        .filter(|s| s.customer_id != customer_id)
        .filter(|s| s.duplication_rule_code.as_deref() == Some(rule_code.as_str()))
        .filter(|s| {
            !store
                .exclusions
                .contains(&exclusion_key(&rule_code, &customer_id, &s.customer_id))
        })
        .map(to_qualified)
        .collect();
    let (page, _) = paginate(&duplicates, &query);
    Ok(Json(DuplicatesResponse {
        status: ResponseStatus::ok(),
        identities: page,
    }))
}

async fn search_duplicates(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<DuplicateSearchRequest>,
) -> Result<Json<DuplicatesResponse>, ApiError> {
    caller(&headers)?;
    if input.attributes.is_empty() && input.rule_codes.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "at least one attribute or rule code is required",
        ));
    }
    let store = db.read().await;
    let identities = store
        .suspicions
        .values()
        .filter(|s| {
            input.rule_codes.is_empty()
                || s.duplication_rule_code
                    .as_ref()
                    .is_some_and(|code| input.rule_codes.contains(code))
        })
        .filter(|s| {
            input
                .attributes
                .iter()
                .all(|a| s.metadata.get(&a.key) == Some(&a.value))
        })
        .map(to_qualified)
        .collect();
    Ok(Json(DuplicatesResponse {
        status: ResponseStatus::ok(),
        identities,
    }))
}

fn exclusion_of(store: &Store, input: &ExcludeRequest) -> Result<ExclusionKey, ApiError> {
    let rule_code = input
        .rule_code
        .as_deref()
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "rule_code is required"))?;
    store.rule(rule_code)?;
    if input.identity_cuid_1 == input.identity_cuid_2 {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "cannot exclude an identity from itself"));
    }
    Ok(exclusion_key(rule_code, &input.identity_cuid_1, &input.identity_cuid_2))
}

async fn exclude(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ExcludeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    caller(&headers)?;
    let mut store = db.write().await;
    let key = exclusion_of(&store, &input)?;
    if !store.exclusions.insert(key) {
        return Err(ApiError::new(StatusCode::CONFLICT, "identities are already excluded"));
    }
    Ok(Json(StatusResponse {
        status: ResponseStatus::ok(),
    }))
}

async fn cancel_exclusion(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ExcludeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    caller(&headers)?;
    let mut store = db.write().await;
    let key = exclusion_of(&store, &input)?;
    if !store.exclusions.remove(&key) {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "identities are not excluded"));
    }
    Ok(Json(StatusResponse {
        status: ResponseStatus::ok(),
    }))
}

/// Taking a lock held by another author is a conflict; releasing is always allowed.
async fn lock(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<LockRequest>,
) -> Result<Json<LockResponse>, ApiError> {
    let caller = caller(&headers)?;
    let mut store = db.write().await;
    let suspicion = store.suspicions.get_mut(&input.customer_id).ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            format!("{} has no suspicion", input.customer_id),
        )
    })?;

    if input.locked {
        if let Some(held) = suspicion.lock.as_ref().filter(|l| l.locked) {
            if held.author_name != caller.author_name || held.author_type != caller.author_type {
                return Err(ApiError::new(
                    StatusCode::CONFLICT,
                    format!("locked by {}", held.author_name),
                ));
            }
        }
        suspicion.lock = Some(Lock {
            locked: true,
            author_name: caller.author_name,
            author_type: caller.author_type,
        });
    } else {
        suspicion.lock = None;
    }

    Ok(Json(LockResponse {
        status: ResponseStatus::ok(),
        locked: input.locked,
    }))
}
