use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;

use arrowhead_api::*;

/// Typed HTTP client for the Project Arrowhead API.
///
/// Provides high-level methods for each API endpoint (using the stored auth
/// token) and low-level `*_with_auth` methods for callers that need
/// per-request auth (e.g. E2E tests exercising multiple users).
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Create a new client with the given base URL and timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        })
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn set_auth(&mut self, token: String) {
        self.auth_token = Some(token);
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Access the underlying `reqwest::Client`.
    pub fn reqwest_client(&self) -> &reqwest::Client {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn token_or_bail(&self) -> Result<&str> {
        self.auth_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("auth token not set"))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.token_or_bail()?;
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        parse_response(resp).await
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.token_or_bail()?;
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        parse_response(resp).await
    }

    async fn put_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.token_or_bail()?;
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        parse_response(resp).await
    }

    // ── Health ────────────────────────────────────────────────────────────

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.client.get(self.url("/health")).send().await?;
        parse_response(resp).await
    }

    // ── Auth ──────────────────────────────────────────────────────────────

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthTokenResponse> {
        let resp = self
            .client
            .post(self.url("/auth/register"))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthTokenResponse> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn refresh(&self, req: &RefreshRequest) -> Result<AuthTokenResponse> {
        let resp = self
            .client
            .post(self.url("/auth/refresh"))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn logout(&self, req: &LogoutRequest) -> Result<OkResponse> {
        self.post_json("/auth/logout", req).await
    }

    pub async fn change_password(&self, req: &ChangePasswordRequest) -> Result<OkResponse> {
        self.put_json("/auth/password", req).await
    }

    pub async fn profile(&self) -> Result<ProfileResponse> {
        self.get_json("/auth/profile").await
    }

    // ── Teams ─────────────────────────────────────────────────────────────

    pub async fn create_team(&self, req: &CreateTeamRequest) -> Result<TeamResponse> {
        self.post_json("/teams", req).await
    }

    pub async fn get_team(&self, team_id: &str) -> Result<TeamDetailResponse> {
        self.get_json(&format!("/teams/{team_id}")).await
    }

    pub async fn update_team(
        &self,
        team_id: &str,
        req: &UpdateTeamRequest,
    ) -> Result<TeamResponse> {
        self.put_json(&format!("/teams/{team_id}"), req).await
    }

    pub async fn list_members(&self, team_id: &str) -> Result<ListMembersResponse> {
        self.get_json(&format!("/teams/{team_id}/members")).await
    }

    pub async fn add_member(
        &self,
        team_id: &str,
        req: &AddMemberRequest,
    ) -> Result<MemberResponse> {
        self.post_json(&format!("/teams/{team_id}/members"), req)
            .await
    }

    // ── Projects ──────────────────────────────────────────────────────────

    pub async fn create_project(
        &self,
        team_id: &str,
        req: &CreateProjectRequest,
    ) -> Result<ProjectResponse> {
        self.post_json(&format!("/teams/{team_id}/projects"), req)
            .await
    }

    pub async fn list_projects(
        &self,
        team_id: &str,
        include_archived: bool,
    ) -> Result<ListProjectsResponse> {
        self.get_json(&format!(
            "/teams/{team_id}/projects?include_archived={include_archived}"
        ))
        .await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<ProjectResponse> {
        self.get_json(&format!("/projects/{project_id}")).await
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        req: &UpdateProjectRequest,
    ) -> Result<ProjectResponse> {
        self.put_json(&format!("/projects/{project_id}"), req).await
    }

    // ── Objectives ────────────────────────────────────────────────────────

    pub async fn create_objective(
        &self,
        project_id: &str,
        req: &CreateObjectiveRequest,
    ) -> Result<ObjectiveResponse> {
        self.post_json(&format!("/projects/{project_id}/objectives"), req)
            .await
    }

    pub async fn list_objectives(&self, project_id: &str) -> Result<ListObjectivesResponse> {
        self.get_json(&format!("/projects/{project_id}/objectives"))
            .await
    }

    pub async fn get_objective(&self, objective_id: &str) -> Result<ObjectiveDetailResponse> {
        self.get_json(&format!("/objectives/{objective_id}")).await
    }

    pub async fn update_objective(
        &self,
        objective_id: &str,
        req: &UpdateObjectiveRequest,
    ) -> Result<ObjectiveDetailResponse> {
        self.put_json(&format!("/objectives/{objective_id}"), req)
            .await
    }

    pub async fn resume_objective(&self, objective_id: &str) -> Result<ResumeResponse> {
        self.get_json(&format!("/objectives/{objective_id}/resume"))
            .await
    }

    pub async fn acquire_lock(&self, objective_id: &str) -> Result<LockResponse> {
        self.post_json(&format!("/objectives/{objective_id}/lock"), &serde_json::json!({}))
            .await
    }

    pub async fn release_lock(&self, objective_id: &str) -> Result<OkResponse> {
        let token = self.token_or_bail()?;
        let resp = self
            .client
            .delete(self.url(&format!("/objectives/{objective_id}/lock")))
            .bearer_auth(token)
            .send()
            .await?;
        parse_response(resp).await
    }

    // ── Tasks ─────────────────────────────────────────────────────────────

    pub async fn create_task(
        &self,
        objective_id: &str,
        req: &CreateTaskRequest,
    ) -> Result<TaskResponse> {
        self.post_json(&format!("/objectives/{objective_id}/tasks"), req)
            .await
    }

    pub async fn list_tasks(&self, objective_id: &str) -> Result<ListTasksResponse> {
        self.get_json(&format!("/objectives/{objective_id}/tasks"))
            .await
    }

    pub async fn update_task(&self, task_id: &str, req: &UpdateTaskRequest) -> Result<TaskResponse> {
        self.put_json(&format!("/tasks/{task_id}"), req).await
    }

    pub async fn reorder_tasks(
        &self,
        objective_id: &str,
        req: &ReorderTasksRequest,
    ) -> Result<ListTasksResponse> {
        self.put_json(&format!("/objectives/{objective_id}/tasks/reorder"), req)
            .await
    }

    // ── RRGT + Dial ───────────────────────────────────────────────────────

    pub async fn my_rrgt(&self) -> Result<ListPlansResponse> {
        self.get_json("/rrgt/mine").await
    }

    pub async fn member_rrgt(&self, member_id: &str) -> Result<MemberRrgtResponse> {
        self.get_json(&format!("/rrgt/{member_id}")).await
    }

    pub async fn update_rabbit(
        &self,
        plan_id: &str,
        req: &UpdateRabbitRequest,
    ) -> Result<RabbitResponse> {
        self.put_json(&format!("/rrgt/plans/{plan_id}/rabbit"), req)
            .await
    }

    pub async fn upsert_subtask(
        &self,
        plan_id: &str,
        req: &UpsertSubtaskRequest,
    ) -> Result<SubtaskResponse> {
        self.put_json(&format!("/rrgt/plans/{plan_id}/subtasks"), req)
            .await
    }

    pub async fn my_dial(&self) -> Result<DialMineResponse> {
        self.get_json("/dial/mine").await
    }

    pub async fn update_dial(&self, req: &UpdateDialRequest) -> Result<DialMineResponse> {
        self.put_json("/dial/mine", req).await
    }

    // ── Touchbases ────────────────────────────────────────────────────────

    pub async fn list_touchbases(&self, objective_id: &str) -> Result<ListTouchbasesResponse> {
        self.get_json(&format!("/objectives/{objective_id}/touchbases"))
            .await
    }

    pub async fn create_touchbase(
        &self,
        objective_id: &str,
        req: &CreateTouchbaseRequest,
    ) -> Result<TouchbaseResponse> {
        self.post_json(&format!("/objectives/{objective_id}/touchbases"), req)
            .await
    }

    // ── Journey sessions (no auth) ────────────────────────────────────────

    pub async fn create_journey_session(
        &self,
        req: &CreateJourneySessionRequest,
    ) -> Result<JourneySessionResponse> {
        let resp = self
            .client
            .post(self.url("/journey/sessions"))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn get_journey_session(&self, session_id: &str) -> Result<JourneySessionResponse> {
        let resp = self
            .client
            .get(self.url(&format!("/journey/sessions/{session_id}")))
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn update_journey_session(
        &self,
        session_id: &str,
        req: &UpdateJourneySessionRequest,
    ) -> Result<JourneySessionResponse> {
        let resp = self
            .client
            .put(self.url(&format!("/journey/sessions/{session_id}")))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn export_journey_session(&self, session_id: &str) -> Result<JourneyExportResponse> {
        let resp = self
            .client
            .get(self.url(&format!("/journey/sessions/{session_id}/export")))
            .send()
            .await?;
        parse_response(resp).await
    }

    // ── Raw helpers (for E2E / advanced usage) ────────────────────────────

    /// Unauthenticated GET returning the raw response.
    pub async fn get_raw(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Authenticated GET returning the raw response.
    pub async fn get_with_auth(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Authenticated POST (no body) returning the raw response.
    pub async fn post_with_auth(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Authenticated POST with JSON body returning the raw response.
    pub async fn post_json_with_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Authenticated PUT with JSON body returning the raw response.
    pub async fn put_json_with_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Authenticated DELETE returning the raw response.
    pub async fn delete_with_auth(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Unauthenticated POST with JSON body returning the raw response.
    pub async fn post_json_raw<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Unauthenticated PUT with JSON body returning the raw response.
    pub async fn put_json_raw<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self.client.put(self.url(path)).json(body).send().await?)
    }

    /// Unauthenticated DELETE returning the raw response.
    pub async fn delete_raw(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }
}

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an error containing the status and body text.
async fn parse_response<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("{status}: {body}");
    }
    Ok(resp.json().await?)
}
