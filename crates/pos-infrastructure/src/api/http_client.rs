// ============================================================================
// POS Infrastructure - HTTP API Client
// File: crates/pos-infrastructure/src/api/http_client.rs
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use pos_core::domain::{CurrentUser, Permission, Role, RoleAssignment};
use pos_core::error::DomainError;
use pos_core::repositories::{IdentityApi, PermissionApi};
use pos_shared::config::ApiSettings;
use pos_shared::{Page, Pagination};

use super::dto::{AssignPermissionsRequest, ErrorBody, MeResponse, RoleResponse};

/// reqwest client for the POS backend.
#[derive(Clone)]
pub struct HttpPosApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPosApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| DomainError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, DomainError> {
        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::text)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                }
            });
        warn!("API error {}: {}", status, message);
        Err(DomainError::Api { status: status.as_u16(), message })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        debug!("GET {}", path);
        let response = self.send(self.request(Method::GET, path)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::Decode(e.to_string()))
    }
}

fn page_query(page: Pagination) -> String {
    format!("page={}&limit={}", page.page, page.per_page)
}

#[async_trait]
impl PermissionApi for HttpPosApi {
    async fn fetch_roles(&self, page: Pagination) -> Result<Page<Role>, DomainError> {
        let raw: Page<RoleAssignment> = self.get_json(&format!("/roles?{}", page_query(page))).await?;
        Ok(raw.map(RoleAssignment::into_role))
    }

    async fn fetch_permissions(&self, page: Pagination) -> Result<Page<Permission>, DomainError> {
        self.get_json(&format!("/permissions?{}", page_query(page))).await
    }

    async fn assign_permissions(
        &self,
        role_id: Uuid,
        permission_ids: Vec<Uuid>,
    ) -> Result<Option<Role>, DomainError> {
        let path = format!("/roles/{}/permissions", role_id);
        debug!("PUT {} ({} permissions)", path, permission_ids.len());
        let request = self
            .request(Method::PUT, &path)
            .json(&AssignPermissionsRequest { permission_ids });
        let response = self.send(request).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<RoleResponse>(&body) {
            Ok(role) => Ok(Some(role.into_role())),
            Err(e) => {
                // The write went through; fall back to the submitted set.
                warn!("Unrecognised assign-permissions response for role {}: {}", role_id, e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl IdentityApi for HttpPosApi {
    async fn current_user(&self) -> Result<Option<CurrentUser>, DomainError> {
        match self.get_json::<MeResponse>("/auth/me").await {
            Ok(me) => Ok(Some(me.into())),
            Err(DomainError::Api { status: 401, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
