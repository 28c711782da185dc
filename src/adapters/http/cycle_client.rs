//! HTTP cycle client - Implementation of the cycle ports over the REST API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpCycleServiceConfig::new("https://app.example.com", api_key)
//!     .with_timeout(Duration::from_secs(10));
//!
//! let service = HttpCycleService::new(config)?;
//! ```
//!
//! # Endpoints
//!
//! All paths hang off `{base_url}/api/workspaces/{slug}`:
//!
//! | Call | Method | Path |
//! |------|--------|------|
//! | workspace list | GET | `/cycles/` |
//! | project list | GET | `/projects/{p}/cycles/[?cycle_view=]` |
//! | detail | GET | `/projects/{p}/cycles/{c}/` |
//! | progress | GET | `/projects/{p}/cycles/{c}/progress/` |
//! | create | POST | `/projects/{p}/cycles/` |
//! | update | PATCH | `/projects/{p}/cycles/{c}/` |
//! | delete | DELETE | `/projects/{p}/cycles/{c}/` |
//! | favorite | POST / DELETE | `/projects/{p}/user-favorite-cycles/[{c}/]` |
//! | date check | POST | `/projects/{p}/cycles/date-check/` |
//! | archived list / detail | GET | `/projects/{p}/archived-cycles/[{c}/]` |
//! | archive / restore | POST / DELETE | `/projects/{p}/cycles/{c}/archive/` |

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::domain::cycle::{
    CyclePatch, CycleProgress, CycleRecord, DateCheckRequest, DateCheckResult,
};
use crate::domain::foundation::{CycleId, ProjectId, WorkspaceSlug};
use crate::ports::{
    ArchiveReceipt, CycleArchiveService, CycleListFilter, CycleService, ServiceError,
};

/// Header carrying the API token.
const API_KEY_HEADER: &str = "X-API-Key";

/// Configuration for the HTTP cycle client.
#[derive(Debug, Clone)]
pub struct HttpCycleServiceConfig {
    /// Token sent with every request.
    api_key: Secret<String>,
    /// Server origin, without the `/api` suffix.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpCycleServiceConfig {
    /// Creates a configuration with a 30 second timeout.
    pub fn new(base_url: impl Into<String>, api_key: Secret<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Cycle API client.
pub struct HttpCycleService {
    config: HttpCycleServiceConfig,
    client: Client,
}

#[derive(Serialize)]
struct FavoriteRequest<'a> {
    cycle: &'a CycleId,
}

impl HttpCycleService {
    /// Creates a client. Fails only if the TLS backend cannot initialise.
    pub fn new(config: HttpCycleServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    // ───────────────────────────────────────────────────────────────
    // URL building
    // ───────────────────────────────────────────────────────────────

    fn workspace_url(&self, workspace: &WorkspaceSlug) -> String {
        format!("{}/api/workspaces/{}", self.config.base_url, workspace)
    }

    fn project_url(&self, workspace: &WorkspaceSlug, project_id: &ProjectId) -> String {
        format!("{}/projects/{}", self.workspace_url(workspace), project_id)
    }

    fn cycles_url(&self, workspace: &WorkspaceSlug, project_id: &ProjectId) -> String {
        format!("{}/cycles/", self.project_url(workspace, project_id))
    }

    fn cycle_url(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> String {
        format!("{}{}/", self.cycles_url(workspace, project_id), cycle_id)
    }

    fn archived_url(&self, workspace: &WorkspaceSlug, project_id: &ProjectId) -> String {
        format!("{}/archived-cycles/", self.project_url(workspace, project_id))
    }

    fn favorites_url(&self, workspace: &WorkspaceSlug, project_id: &ProjectId) -> String {
        format!(
            "{}/user-favorite-cycles/",
            self.project_url(workspace, project_id)
        )
    }

    // ───────────────────────────────────────────────────────────────
    // Transport
    // ───────────────────────────────────────────────────────────────

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                ServiceError::network(format!("Connection failed: {}", e))
            } else {
                ServiceError::network(e.to_string())
            }
        })?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Cycle API returned {}: {}", status, body);
        match status {
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound(body)),
            _ => Err(ServiceError::status(status.as_u16(), body)),
        }
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn empty(&self, request: RequestBuilder) -> Result<(), ServiceError> {
        self.send(request).await.map(|_| ())
    }
}

#[async_trait]
impl CycleService for HttpCycleService {
    async fn list_workspace_cycles(
        &self,
        workspace: &WorkspaceSlug,
    ) -> Result<Vec<CycleRecord>, ServiceError> {
        let url = format!("{}/cycles/", self.workspace_url(workspace));
        self.json(self.request(Method::GET, url)).await
    }

    async fn list_project_cycles(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        filter: Option<CycleListFilter>,
    ) -> Result<Vec<CycleRecord>, ServiceError> {
        let mut request = self.request(Method::GET, self.cycles_url(workspace, project_id));
        if let Some(filter) = filter {
            request = request.query(&[("cycle_view", filter.as_query_value())]);
        }
        self.json(request).await
    }

    async fn get_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleRecord, ServiceError> {
        let url = self.cycle_url(workspace, project_id, cycle_id);
        self.json(self.request(Method::GET, url)).await
    }

    async fn cycle_progress(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleProgress, ServiceError> {
        let url = format!("{}progress/", self.cycle_url(workspace, project_id, cycle_id));
        self.json(self.request(Method::GET, url)).await
    }

    async fn create_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        payload: &CyclePatch,
    ) -> Result<CycleRecord, ServiceError> {
        let url = self.cycles_url(workspace, project_id);
        self.json(self.request(Method::POST, url).json(payload)).await
    }

    async fn patch_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
        payload: &CyclePatch,
    ) -> Result<CycleRecord, ServiceError> {
        let url = self.cycle_url(workspace, project_id, cycle_id);
        self.json(self.request(Method::PATCH, url).json(payload)).await
    }

    async fn delete_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        let url = self.cycle_url(workspace, project_id, cycle_id);
        self.empty(self.request(Method::DELETE, url)).await
    }

    async fn add_favorite(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        let url = self.favorites_url(workspace, project_id);
        let body = FavoriteRequest { cycle: cycle_id };
        self.empty(self.request(Method::POST, url).json(&body)).await
    }

    async fn remove_favorite(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        let url = format!("{}{}/", self.favorites_url(workspace, project_id), cycle_id);
        self.empty(self.request(Method::DELETE, url)).await
    }

    async fn check_dates(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        payload: &DateCheckRequest,
    ) -> Result<DateCheckResult, ServiceError> {
        let url = format!("{}date-check/", self.cycles_url(workspace, project_id));
        self.json(self.request(Method::POST, url).json(payload)).await
    }
}

#[async_trait]
impl CycleArchiveService for HttpCycleService {
    async fn list_archived_cycles(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
    ) -> Result<Vec<CycleRecord>, ServiceError> {
        let url = self.archived_url(workspace, project_id);
        self.json(self.request(Method::GET, url)).await
    }

    async fn get_archived_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<CycleRecord, ServiceError> {
        let url = format!("{}{}/", self.archived_url(workspace, project_id), cycle_id);
        self.json(self.request(Method::GET, url)).await
    }

    async fn archive_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<ArchiveReceipt, ServiceError> {
        let url = format!("{}archive/", self.cycle_url(workspace, project_id, cycle_id));
        self.json(self.request(Method::POST, url)).await
    }

    async fn restore_cycle(
        &self,
        workspace: &WorkspaceSlug,
        project_id: &ProjectId,
        cycle_id: &CycleId,
    ) -> Result<(), ServiceError> {
        let url = format!("{}archive/", self.cycle_url(workspace, project_id, cycle_id));
        self.empty(self.request(Method::DELETE, url)).await
    }
}
