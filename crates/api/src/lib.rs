//! Shared API types, crypto, and SQL builders for Project Arrowhead.
//!
//! This crate is the **single source of truth** for all API request/response
//! types. TypeScript types are auto-generated via `ts-rs` and consumed by the
//! web frontend.
//!
//! To regenerate TypeScript types:
//!   cargo test -p arrowhead-api --features ts -- export_typescript --nocapture

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub mod crypto;
#[cfg(feature = "backend")]
pub mod db;
#[cfg(feature = "backend")]
pub mod service;

// Re-export the domain vocabulary for convenience
pub use arrowhead_core::{
    CompletionStatus, JourneyModule, JourneyStatus, StepAnswers, TaskPriority, TaskStatus,
    TeamRole,
};
pub use arrowhead_core::rrgt::DialSlot;

// ─── Auth ────────────────────────────────────────────────────────────────────

/// Email + password registration.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Email + password login.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned on successful login / register / refresh.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user_id: String,
    pub display_name: String,
}

/// Refresh token rotation request.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Logout request (invalidate refresh token).
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Change password request.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// The caller's team placement, embedded in [`ProfileResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TeamContext {
    pub team_id: String,
    pub team_member_id: String,
    pub role: TeamRole,
}

/// Returned by `GET /api/auth/profile` — user identity plus team context.
///
/// `team` is `null` until the user creates or is added to a team; the
/// frontend uses it to learn the caller's role and team member id.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: String,
    pub team: Option<TeamContext>,
}

/// Generic success response for operations that don't return data.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct OkResponse {
    pub ok: bool,
}

// ─── Teams ──────────────────────────────────────────────────────────────────

/// Request body for `POST /api/teams`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Single team record.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: String,
}

/// Returned by `GET /api/teams/:id` — team info with member count.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(flatten))]
    pub team: TeamResponse,
    pub member_count: i64,
}

/// Request body for `PUT /api/teams/:id` — partial team update.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Single team member record.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct MemberResponse {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub role: TeamRole,
    pub joined_at: String,
}

/// Returned by `GET /api/teams/:id/members`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ListMembersResponse {
    pub members: Vec<MemberResponse>,
}

/// Request body for `POST /api/teams/:id/members` — add an existing user by
/// email.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct AddMemberRequest {
    pub email: String,
    pub role: Option<TeamRole>,
}

/// Request body for `PUT /api/teams/:id/members/:member_id`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateMemberRequest {
    pub role: TeamRole,
}

// ─── Projects ───────────────────────────────────────────────────────────────

/// Request body for `POST /api/teams/:id/projects`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreateProjectRequest {
    pub name: String,
    pub vision: Option<String>,
    pub estimated_completion_date: Option<String>,
}

/// Single project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProjectResponse {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub vision: Option<String>,
    pub completion_status: CompletionStatus,
    pub estimated_completion_date: Option<String>,
    pub is_archived: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Returned by `GET /api/teams/:id/projects`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ListProjectsResponse {
    pub projects: Vec<ProjectResponse>,
}

/// Query parameters for `GET /api/teams/:id/projects`.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProjectListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

/// Request body for `PUT /api/projects/:id` — partial project update.
#[derive(Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub vision: Option<String>,
    pub completion_status: Option<CompletionStatus>,
    pub estimated_completion_date: Option<String>,
    pub is_archived: Option<bool>,
}

// ─── Objectives ─────────────────────────────────────────────────────────────

/// Request body for `POST /api/projects/:id/objectives`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreateObjectiveRequest {
    pub name: String,
    /// Start at step 1 (Brainstorm) instead of step 11 (Objectives).
    #[serde(default)]
    pub start_with_brainstorm: bool,
    pub target_date: Option<String>,
}

/// Objective summary returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ObjectiveResponse {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub current_step: u32,
    pub journey_status: JourneyStatus,
    pub target_completion_date: Option<String>,
    pub actual_completion_date: Option<String>,
    pub is_archived: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Objective with its three step-answer maps, returned by detail/resume.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ObjectiveDetailResponse {
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(flatten))]
    pub objective: ObjectiveResponse,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string>"))]
    pub brainstorm_data: StepAnswers,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string>"))]
    pub choose_data: StepAnswers,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string>"))]
    pub objectives_data: StepAnswers,
}

/// Returned by `GET /api/projects/:id/objectives`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ListObjectivesResponse {
    pub objectives: Vec<ObjectiveResponse>,
}

/// Query parameters for `GET /api/projects/:id/objectives`.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ObjectiveListQuery {
    #[serde(default)]
    pub include_archived: bool,
    /// Filter by journey status; absent = all.
    pub journey_status: Option<JourneyStatus>,
}

/// Request body for `PUT /api/objectives/:id` — journey progress save.
///
/// Step-answer maps merge field-by-field into the stored JSON; everything
/// else overwrites when present.
#[derive(Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateObjectiveRequest {
    pub name: Option<String>,
    pub current_step: Option<u32>,
    pub journey_status: Option<JourneyStatus>,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string> | null"))]
    pub brainstorm_data: Option<StepAnswers>,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string> | null"))]
    pub choose_data: Option<StepAnswers>,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string> | null"))]
    pub objectives_data: Option<StepAnswers>,
    pub target_completion_date: Option<String>,
    pub is_archived: Option<bool>,
}

/// Lock status embedded in `GET /api/objectives/:id/resume`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct LockStatusResponse {
    pub locked_by_me: bool,
    pub locked_by_other: bool,
    pub holder_member_id: Option<String>,
    pub holder_display_name: Option<String>,
    /// Unix seconds; present while any live lock exists.
    pub expires_at: Option<u64>,
}

/// Returned by `GET /api/objectives/:id/resume`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ResumeResponse {
    pub objective: ObjectiveDetailResponse,
    pub lock: LockStatusResponse,
}

/// Returned by `POST /api/objectives/:id/lock` — acquire or renew.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct LockResponse {
    pub acquired: bool,
    /// Unix seconds.
    pub expires_at: u64,
}

// ─── Tasks (Scoreboard) ─────────────────────────────────────────────────────

/// Request body for `POST /api/objectives/:id/tasks`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
    #[serde(default)]
    pub assigned_member_ids: Vec<String>,
}

/// A member a task is assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TaskAssignee {
    pub team_member_id: String,
    pub display_name: String,
}

/// Single scoreboard task with its assignees.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TaskResponse {
    pub id: String,
    pub objective_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<String>,
    pub sort_order: i64,
    pub assigned_members: Vec<TaskAssignee>,
    pub created_at: String,
    pub updated_at: String,
}

/// Returned by `GET /api/objectives/:id/tasks`, ordered by sort_order.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ListTasksResponse {
    pub tasks: Vec<TaskResponse>,
}

/// Request body for `PUT /api/tasks/:id` — partial task update.
///
/// `assigned_member_ids`, when present, replaces the full assignment set.
#[derive(Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
    pub assigned_member_ids: Option<Vec<String>>,
}

/// Request body for `PUT /api/objectives/:id/tasks/reorder`.
///
/// `task_ids` must be exactly the objective's task ids in the desired order.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ReorderTasksRequest {
    pub task_ids: Vec<String>,
}

// ─── Journey sessions (guest flow) ──────────────────────────────────────────

/// Request body for `POST /api/journey/sessions` — start a guest journey.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreateJourneySessionRequest {
    /// Opaque client-chosen identifier.
    pub session_id: String,
    pub module: JourneyModule,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string> | null"))]
    pub step_data: Option<StepAnswers>,
    pub current_step: Option<u32>,
}

/// Single guest journey session.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct JourneySessionResponse {
    pub id: String,
    pub session_id: String,
    pub module: JourneyModule,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string>"))]
    pub step_data: StepAnswers,
    pub completed_steps: Vec<u32>,
    pub current_step: u32,
    pub is_completed: bool,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for `PUT /api/journey/sessions/:session_id`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateJourneySessionRequest {
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string> | null"))]
    pub step_data: Option<StepAnswers>,
    pub completed_steps: Option<Vec<u32>>,
    pub current_step: Option<u32>,
    pub is_completed: Option<bool>,
}

/// Request body for `POST /api/journey/tasks`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreateJourneyTaskRequest {
    pub session_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
}

/// Single guest-session task.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct JourneyTaskResponse {
    pub id: String,
    pub session_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Returned by `GET /api/journey/tasks?session_id=`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ListJourneyTasksResponse {
    pub tasks: Vec<JourneyTaskResponse>,
}

/// Request body for `PUT /api/journey/tasks/:id`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateJourneyTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
}

/// Returned by `GET /api/journey/sessions/:session_id/export` — the bundle
/// the client renders into PDF/markdown.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct JourneyExportResponse {
    pub export_type: JourneyModule,
    pub export_date: String,
    pub session: JourneySessionResponse,
    pub tasks: Vec<JourneyTaskResponse>,
}

// ─── RRGT ───────────────────────────────────────────────────────────────────

/// Query parameters for `GET /api/rrgt/mine`.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RrgtQuery {
    pub project_id: Option<String>,
    pub objective_id: Option<String>,
}

/// Task summary nested in a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RrgtTaskInfo {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<String>,
}

/// Objective summary nested in a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RrgtObjectiveInfo {
    pub id: String,
    pub project_id: String,
    pub name: String,
}

/// Rabbit marker position within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RabbitResponse {
    pub plan_id: String,
    pub current_column_index: i64,
    pub updated_at: String,
}

/// One subtask cell of a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SubtaskResponse {
    pub id: String,
    pub plan_id: String,
    pub column_index: i64,
    pub text: Option<String>,
    pub updated_at: String,
}

/// One row of the RRGT grid: a plan with its task, objective, rabbit, and
/// subtask cells.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RrgtPlanResponse {
    pub id: String,
    pub task_id: String,
    pub team_member_id: String,
    pub project_id: String,
    pub objective_id: String,
    pub max_column_index: i64,
    pub task: RrgtTaskInfo,
    pub objective: RrgtObjectiveInfo,
    pub rabbit: Option<RabbitResponse>,
    pub subtasks: Vec<SubtaskResponse>,
}

/// Returned by `GET /api/rrgt/mine`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ListPlansResponse {
    pub plans: Vec<RrgtPlanResponse>,
    pub total: usize,
}

/// Returned by `GET /api/rrgt/:member_id` — manager god-view of another
/// member's grid, dial privacy respected.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct MemberRrgtResponse {
    pub team_member_id: String,
    pub plans: Vec<RrgtPlanResponse>,
    pub dial_state: Option<DialStateResponse>,
}

/// Request body for `PUT /api/rrgt/plans/:plan_id/rabbit`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateRabbitRequest {
    pub column_index: i64,
}

/// Request body for `PUT /api/rrgt/plans/:plan_id/subtasks`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpsertSubtaskRequest {
    pub column_index: i64,
    pub text: String,
}

// ─── Dial ───────────────────────────────────────────────────────────────────

/// The caller's dial state, slots enriched with the underlying task titles.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct DialStateResponse {
    pub team_member_id: String,
    pub left_plan_id: Option<String>,
    pub left_column_index: Option<i64>,
    pub left_text: Option<String>,
    pub left_task_title: Option<String>,
    pub is_left_private: bool,
    pub right_plan_id: Option<String>,
    pub right_column_index: Option<i64>,
    pub right_task_title: Option<String>,
    pub is_right_private: bool,
    pub selected_slot: Option<DialSlot>,
    pub updated_at: String,
}

/// Returned by `GET /api/dial/mine`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct DialMineResponse {
    pub dial_state: Option<DialStateResponse>,
}

/// Request body for `PUT /api/dial/mine` — full-state replace.
///
/// Absent slot fields clear the slot; referenced plans must belong to the
/// caller.
#[derive(Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UpdateDialRequest {
    pub left_plan_id: Option<String>,
    pub left_column_index: Option<i64>,
    pub left_text: Option<String>,
    #[serde(default)]
    pub is_left_private: bool,
    pub right_plan_id: Option<String>,
    pub right_column_index: Option<i64>,
    #[serde(default)]
    pub is_right_private: bool,
    pub selected_slot: Option<DialSlot>,
}

// ─── Touchbases ─────────────────────────────────────────────────────────────

/// Request body for `POST /api/objectives/:id/touchbases`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CreateTouchbaseRequest {
    /// Defaults to now.
    pub touchbase_date: Option<String>,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string>"))]
    pub responses: BTreeMap<String, String>,
}

/// Single touchbase record with the member's display name.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TouchbaseResponse {
    pub id: String,
    pub objective_id: String,
    pub team_member_id: String,
    pub team_member_name: String,
    pub touchbase_date: String,
    #[cfg_attr(feature = "ts", ts(type = "Record<string, string>"))]
    pub responses: BTreeMap<String, String>,
    pub created_at: String,
}

/// Returned by `GET /api/objectives/:id/touchbases`, newest first.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ListTouchbasesResponse {
    pub touchbases: Vec<TouchbaseResponse>,
}

// ─── Health ─────────────────────────────────────────────────────────────────

/// Returned by `GET /api/health` — server liveness check.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ─── Service Error ──────────────────────────────────────────────────────────

/// Framework-agnostic service error.
///
/// Each variant maps to an HTTP status code; the server converts it into the
/// `{"message", "error"}` envelope.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ServiceError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Locked(String),
    Internal(String),
}

impl ServiceError {
    /// HTTP status code as a `u16`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Locked(_) => 423,
            Self::Internal(_) => 500,
        }
    }

    /// Canonical reason phrase for the envelope's `message` field.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "Bad Request",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Forbidden(_) => "Forbidden",
            Self::NotFound(_) => "Not Found",
            Self::Conflict(_) => "Conflict",
            Self::Locked(_) => "Locked",
            Self::Internal(_) => "Internal Server Error",
        }
    }

    /// The error detail.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Locked(m)
            | Self::Internal(m) => m,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ServiceError {}

/// The JSON error envelope `{ "message": "...", "error": "..." }` returned
/// by every error response.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ApiError {
    pub message: String,
    pub error: String,
}

impl From<&ServiceError> for ApiError {
    fn from(e: &ServiceError) -> Self {
        Self {
            message: e.reason().to_string(),
            error: e.message().to_string(),
        }
    }
}

// ─── TypeScript generation ───────────────────────────────────────────────────

#[cfg(all(test, feature = "ts"))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use ts_rs::TS;

    /// Run with: cargo test -p arrowhead-api --features ts -- export_typescript --nocapture
    #[test]
    fn export_typescript() {
        let out_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../web/src/api-types.generated.ts");

        let cfg = ts_rs::Config::new().with_large_int("number");
        let mut parts: Vec<String> = Vec::new();
        parts.push("// AUTO-GENERATED by arrowhead-api — DO NOT EDIT".to_string());
        parts.push(
            "// Regenerate with: cargo test -p arrowhead-api --features ts -- export_typescript"
                .to_string(),
        );
        parts.push(String::new());

        macro_rules! collect_ts {
            ($($t:ty),+ $(,)?) => {
                $(
                    let decl = <$t>::decl(&cfg);
                    let decl = if decl.contains(" = {") {
                        decl
                            .replacen("type ", "export interface ", 1)
                            .replace(" = {", " {")
                            .trim_end_matches(';')
                            .to_string()
                    } else {
                        decl
                            .replacen("type ", "export type ", 1)
                            .trim_end_matches(';')
                            .to_string()
                    };
                    parts.push(decl);
                    parts.push(String::new());
                )+
            };
        }

        collect_ts!(
            // Auth
            RegisterRequest,
            LoginRequest,
            AuthTokenResponse,
            RefreshRequest,
            LogoutRequest,
            ChangePasswordRequest,
            TeamContext,
            ProfileResponse,
            OkResponse,
            // Teams
            CreateTeamRequest,
            TeamResponse,
            TeamDetailResponse,
            UpdateTeamRequest,
            MemberResponse,
            ListMembersResponse,
            AddMemberRequest,
            UpdateMemberRequest,
            // Projects
            CreateProjectRequest,
            ProjectResponse,
            ListProjectsResponse,
            UpdateProjectRequest,
            // Objectives
            CreateObjectiveRequest,
            ObjectiveResponse,
            ObjectiveDetailResponse,
            ListObjectivesResponse,
            UpdateObjectiveRequest,
            LockStatusResponse,
            ResumeResponse,
            LockResponse,
            // Tasks
            CreateTaskRequest,
            TaskAssignee,
            TaskResponse,
            ListTasksResponse,
            UpdateTaskRequest,
            ReorderTasksRequest,
            // Journey sessions
            CreateJourneySessionRequest,
            JourneySessionResponse,
            UpdateJourneySessionRequest,
            CreateJourneyTaskRequest,
            JourneyTaskResponse,
            ListJourneyTasksResponse,
            UpdateJourneyTaskRequest,
            JourneyExportResponse,
            // RRGT
            RrgtTaskInfo,
            RrgtObjectiveInfo,
            RabbitResponse,
            SubtaskResponse,
            RrgtPlanResponse,
            ListPlansResponse,
            MemberRrgtResponse,
            UpdateRabbitRequest,
            UpsertSubtaskRequest,
            // Dial
            DialStateResponse,
            DialMineResponse,
            UpdateDialRequest,
            // Touchbases
            CreateTouchbaseRequest,
            TouchbaseResponse,
            ListTouchbasesResponse,
            // Health
            HealthResponse,
            ApiError,
        );

        let content = parts.join("\n");

        if let Some(parent) = out_dir.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let mut file = std::fs::File::create(&out_dir)
            .unwrap_or_else(|e| panic!("Failed to create {}: {}", out_dir.display(), e));
        file.write_all(content.as_bytes())
            .unwrap_or_else(|e| panic!("Failed to write {}: {}", out_dir.display(), e));

        println!("Generated TypeScript types at: {}", out_dir.display());
    }
}
