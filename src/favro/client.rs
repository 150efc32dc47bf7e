use crate::config::Config;
use crate::favro::credentials::Credentials;
use crate::favro::error::FavroError;
use crate::favro::pagination::{fetch_all, Page};
use crate::favro::retry::{RateLimitInfo, RetryPolicy, RetryState, Sleeper, TokioSleeper};
use crate::favro::types::{
    Card, CardQuery, Collection, Column, Comment, CreateCardRequest, CreateColumnRequest,
    CreateCommentRequest, Organization, Tag, UpdateCardRequest, UpdateColumnRequest, User, Widget,
};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://favro.com/api/v1";
pub const HEADER_ORGANIZATION_ID: &str = "organizationId";
pub const HEADER_BACKEND_IDENTIFIER: &str = "X-Favro-Backend-Identifier";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path for one entity, with the caller-supplied id encoded as a single segment.
///
/// Dot segments cannot be escaped in a URL, so `.` and `..` are reported as
/// missing entities rather than sent.
pub fn entity_path(collection: &str, id: &str) -> Result<String, FavroError> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(FavroError::NotFound {
            message: format!("No entity under {} with id '{}'", collection, id),
        });
    }
    Ok(format!("{}/{}", collection, urlencoding::encode(id)))
}

/// Backend instance observed during one logical operation.
///
/// Favro only guarantees a consistent pagination cursor when every page is
/// served by the same backend, so the identifier from a successful response is
/// echoed on the following requests of the same operation. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct BackendRouting {
    backend_id: Arc<Mutex<Option<String>>>,
}

impl BackendRouting {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn backend_id(&self) -> Option<String> {
        self.backend_id.lock().await.clone()
    }

    async fn observe(&self, headers: &HeaderMap) {
        let observed = headers
            .get(HEADER_BACKEND_IDENTIFIER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty());

        if let Some(id) = observed {
            *self.backend_id.lock().await = Some(id.to_string());
        }
    }
}

/// A single outbound call, described independently of credentials and routing
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub organization_id: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            organization_id: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, params: Vec<(String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    pub fn with_organization(mut self, organization_id: &str) -> Self {
        self.organization_id = Some(organization_id.to_string());
        self
    }
}

/// Favro API client with rate-limit aware retries and transparent pagination
pub struct FavroClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl FavroClient {
    /// Create a new Favro API client
    pub fn new(credentials: Credentials, base_url: &str) -> Result<Self, FavroError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("favro-mcp-server/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            retry_policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FavroError> {
        let credentials = Credentials::from_config(config)?;
        Self::new(credentials, &config.api_url)
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Replace the timer used between retries (tests record instead of sleeping)
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Perform one logical request, retrying on 429, 5xx and connection failures
    pub async fn send(
        &self,
        routing: &BackendRouting,
        request: &ApiRequest,
    ) -> Result<Value, FavroError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let response = match self.build_request(&url, routing, request).await.send().await {
                Ok(response) => response,
                Err(e) => match self.retry_policy.after_transient_failure(attempt) {
                    RetryState::Backoff { delay } => {
                        warn!(
                            method = %request.method,
                            path = %request.path,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Request failed, retrying"
                        );
                        self.sleeper.sleep(delay).await;
                        continue;
                    }
                    _ => return Err(FavroError::Http(e)),
                },
            };

            let status = response.status();
            let info = RateLimitInfo::from_headers(response.headers());

            match self.retry_policy.next_state(status.as_u16(), &info, attempt) {
                RetryState::Success => {
                    debug!(
                        method = %request.method,
                        path = %request.path,
                        status = status.as_u16(),
                        attempt,
                        remaining = ?info.remaining,
                        "Request succeeded"
                    );
                    routing.observe(response.headers()).await;
                    return Self::read_success(status, response).await;
                }
                RetryState::Backoff { delay } => {
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        status = status.as_u16(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient Favro response, backing off"
                    );
                    self.sleeper.sleep(delay).await;
                }
                RetryState::Exhausted => {
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        status = status.as_u16(),
                        attempt,
                        "Retries exhausted"
                    );
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        return Err(FavroError::RateLimitExhausted {
                            attempts: attempt,
                            reset: info.reset,
                        });
                    }
                    return Err(FavroError::UpstreamServer {
                        status: status.as_u16(),
                        message: Self::error_message(response).await,
                    });
                }
                RetryState::Fatal => {
                    return Err(Self::status_error(status, response).await);
                }
            }
        }
    }

    /// Fetch every page of a list endpoint, pinned to one backend
    pub async fn send_paginated<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<Vec<T>, FavroError> {
        let routing = BackendRouting::new();

        fetch_all(|cursor| {
            let routing = routing.clone();
            let page_request = request.clone().with_query(cursor.query_params());
            async move {
                let value = self.send(&routing, &page_request).await?;
                let page: Page<T> = serde_json::from_value(value)?;
                Ok(page)
            }
        })
        .await
    }

    async fn send_single<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, FavroError> {
        let value = self.send(&BackendRouting::new(), &request).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn send_discarding(&self, request: ApiRequest) -> Result<(), FavroError> {
        self.send(&BackendRouting::new(), &request).await?;
        Ok(())
    }

    async fn build_request(
        &self,
        url: &str,
        routing: &BackendRouting,
        request: &ApiRequest,
    ) -> reqwest::RequestBuilder {
        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .header(AUTHORIZATION, self.credentials.auth_header_value());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(org) = &request.organization_id {
            builder = builder.header(HEADER_ORGANIZATION_ID, org);
        }
        if let Some(backend_id) = routing.backend_id().await {
            builder = builder.header(HEADER_BACKEND_IDENTIFIER, backend_id);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder
    }

    async fn read_success(
        status: StatusCode,
        response: reqwest::Response,
    ) -> Result<Value, FavroError> {
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let json: Value = serde_json::from_str(&text)?;

        // Favro occasionally reports failures as a bare {"message": ...} with 200
        if let Some(obj) = json.as_object() {
            if obj.len() == 1 {
                if let Some(message) = obj.get("message") {
                    return Err(FavroError::Api {
                        status: status.as_u16(),
                        message: message
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| message.to_string()),
                    });
                }
            }
        }

        Ok(json)
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> FavroError {
        let message = Self::error_message(response).await;
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FavroError::Authentication {
                status: status.as_u16(),
                message,
            },
            StatusCode::NOT_FOUND => FavroError::NotFound { message },
            _ => FavroError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .or_else(|| Some(text).filter(|t| !t.trim().is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            })
    }

    // ==================== Organizations ====================

    /// List organizations visible to the credentials (no organization header)
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, FavroError> {
        self.send_paginated(&ApiRequest::get("/organizations"))
            .await
    }

    pub async fn get_organization(
        &self,
        organization_id: &str,
    ) -> Result<Organization, FavroError> {
        let path = entity_path("/organizations", organization_id)?;
        self.send_single(ApiRequest::get(path)).await
    }

    // ==================== Collections ====================

    pub async fn list_collections(&self, org: &str) -> Result<Vec<Collection>, FavroError> {
        let request = ApiRequest::get("/collections")
            .with_organization(org)
            .with_query(vec![("archived".to_string(), "false".to_string())]);
        self.send_paginated(&request).await
    }

    // ==================== Widgets (boards) ====================

    pub async fn list_widgets(
        &self,
        org: &str,
        collection_id: Option<&str>,
    ) -> Result<Vec<Widget>, FavroError> {
        let mut request = ApiRequest::get("/widgets").with_organization(org);
        if let Some(collection) = collection_id {
            request =
                request.with_query(vec![("collectionId".to_string(), collection.to_string())]);
        }
        self.send_paginated(&request).await
    }

    pub async fn get_widget(
        &self,
        org: &str,
        widget_common_id: &str,
    ) -> Result<Widget, FavroError> {
        let path = entity_path("/widgets", widget_common_id)?;
        self.send_single(ApiRequest::get(path).with_organization(org))
            .await
    }

    // ==================== Columns ====================

    /// List a widget's columns, sorted by position
    pub async fn list_columns(
        &self,
        org: &str,
        widget_common_id: &str,
    ) -> Result<Vec<Column>, FavroError> {
        let request = ApiRequest::get("/columns")
            .with_organization(org)
            .with_query(vec![(
                "widgetCommonId".to_string(),
                widget_common_id.to_string(),
            )]);
        let mut columns: Vec<Column> = self.send_paginated(&request).await?;
        columns.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(columns)
    }

    pub async fn get_column(&self, org: &str, column_id: &str) -> Result<Column, FavroError> {
        let path = entity_path("/columns", column_id)?;
        self.send_single(ApiRequest::get(path).with_organization(org))
            .await
    }

    pub async fn create_column(
        &self,
        org: &str,
        request_body: &CreateColumnRequest,
    ) -> Result<Column, FavroError> {
        let body = serde_json::to_value(request_body)?;
        self.send_single(ApiRequest::post("/columns", body).with_organization(org))
            .await
    }

    pub async fn update_column(
        &self,
        org: &str,
        column_id: &str,
        request_body: &UpdateColumnRequest,
    ) -> Result<Column, FavroError> {
        let body = serde_json::to_value(request_body)?;
        self.send_single(
            ApiRequest::put(entity_path("/columns", column_id)?, body).with_organization(org),
        )
        .await
    }

    pub async fn delete_column(&self, org: &str, column_id: &str) -> Result<(), FavroError> {
        self.send_discarding(
            ApiRequest::delete(entity_path("/columns", column_id)?).with_organization(org),
        )
        .await
    }

    // ==================== Cards ====================

    pub async fn list_cards(&self, org: &str, query: &CardQuery) -> Result<Vec<Card>, FavroError> {
        let request = ApiRequest::get("/cards")
            .with_organization(org)
            .with_query(query.query_params());
        self.send_paginated(&request).await
    }

    pub async fn get_card(&self, org: &str, card_id: &str) -> Result<Card, FavroError> {
        self.send_single(ApiRequest::get(entity_path("/cards", card_id)?).with_organization(org))
            .await
    }

    pub async fn create_card(
        &self,
        org: &str,
        request_body: &CreateCardRequest,
    ) -> Result<Card, FavroError> {
        let body = serde_json::to_value(request_body)?;
        self.send_single(ApiRequest::post("/cards", body).with_organization(org))
            .await
    }

    pub async fn update_card(
        &self,
        org: &str,
        card_id: &str,
        request_body: &UpdateCardRequest,
    ) -> Result<Card, FavroError> {
        let body = serde_json::to_value(request_body)?;
        let path = entity_path("/cards", card_id)?;
        self.send_single(ApiRequest::put(path, body).with_organization(org))
            .await
    }

    /// Delete a card from its board, or from every board when `everywhere`
    pub async fn delete_card(
        &self,
        org: &str,
        card_id: &str,
        everywhere: bool,
    ) -> Result<(), FavroError> {
        let mut request =
            ApiRequest::delete(entity_path("/cards", card_id)?).with_organization(org);
        if everywhere {
            request = request.with_query(vec![("everywhere".to_string(), "true".to_string())]);
        }
        self.send_discarding(request).await
    }

    // ==================== Tags & users ====================

    pub async fn list_tags(&self, org: &str) -> Result<Vec<Tag>, FavroError> {
        self.send_paginated(&ApiRequest::get("/tags").with_organization(org))
            .await
    }

    pub async fn get_tag(&self, org: &str, tag_id: &str) -> Result<Tag, FavroError> {
        self.send_single(ApiRequest::get(entity_path("/tags", tag_id)?).with_organization(org))
            .await
    }

    pub async fn list_users(&self, org: &str) -> Result<Vec<User>, FavroError> {
        self.send_paginated(&ApiRequest::get("/users").with_organization(org))
            .await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, FavroError> {
        self.send_single(ApiRequest::get(entity_path("/users", user_id)?))
            .await
    }

    // ==================== Comments ====================

    pub async fn list_comments(
        &self,
        org: &str,
        card_common_id: &str,
    ) -> Result<Vec<Comment>, FavroError> {
        let request = ApiRequest::get("/comments")
            .with_organization(org)
            .with_query(vec![(
                "cardCommonId".to_string(),
                card_common_id.to_string(),
            )]);
        self.send_paginated(&request).await
    }

    pub async fn create_comment(
        &self,
        org: &str,
        card_common_id: &str,
        comment: &str,
    ) -> Result<Comment, FavroError> {
        let body = serde_json::to_value(CreateCommentRequest {
            card_common_id: card_common_id.to_string(),
            comment: comment.to_string(),
        })?;
        self.send_single(ApiRequest::post("/comments", body).with_organization(org))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> FavroClient {
        let credentials = Credentials::new("user@example.com", "token", None).unwrap();
        FavroClient::new(credentials, "https://favro.example/api/v1/").unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = test_client();
        assert_eq!(client.base_url, "https://favro.example/api/v1");
    }

    #[test]
    fn test_api_request_builders() {
        let request = ApiRequest::put("/cards/c-1", serde_json::json!({"name": "x"}))
            .with_organization("org-1")
            .with_query(vec![("a".to_string(), "b".to_string())]);

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/cards/c-1");
        assert_eq!(request.organization_id.as_deref(), Some("org-1"));
        assert_eq!(request.query.len(), 1);
        assert!(request.body.is_some());
    }

    #[test]
    fn test_entity_path_encodes_identifier() {
        assert_eq!(entity_path("/cards", "c-1").unwrap(), "/cards/c-1");
        assert_eq!(
            entity_path("/columns", "To do?#x/y").unwrap(),
            "/columns/To%20do%3F%23x%2Fy"
        );
    }

    #[test]
    fn test_entity_path_rejects_dot_segments() {
        for id in ["", ".", ".."] {
            assert!(matches!(
                entity_path("/widgets", id),
                Err(FavroError::NotFound { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_routing_ignores_empty_backend_header() {
        let routing = BackendRouting::new();
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_BACKEND_IDENTIFIER, "".parse().unwrap());
        routing.observe(&headers).await;
        assert!(routing.backend_id().await.is_none());

        headers.insert(HEADER_BACKEND_IDENTIFIER, "backend-7".parse().unwrap());
        routing.observe(&headers).await;
        assert_eq!(routing.backend_id().await.as_deref(), Some("backend-7"));
    }

    #[tokio::test]
    async fn test_routing_clones_share_state() {
        let routing = BackendRouting::new();
        let clone = routing.clone();
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_BACKEND_IDENTIFIER, "backend-1".parse().unwrap());
        clone.observe(&headers).await;
        assert_eq!(routing.backend_id().await.as_deref(), Some("backend-1"));
    }
}
