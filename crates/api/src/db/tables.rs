//! Compile-time–checked column identifiers for all tables.

use sea_query::Iden;

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Email,
    DisplayName,
    PasswordHash,
    PasswordSalt,
    CreatedAt,
}

#[derive(Iden)]
pub enum RefreshTokens {
    Table,
    Id,
    UserId,
    TokenHash,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
pub enum Teams {
    Table,
    Id,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
pub enum TeamMembers {
    Table,
    Id,
    TeamId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(Iden)]
pub enum Projects {
    Table,
    Id,
    TeamId,
    Name,
    Vision,
    CompletionStatus,
    EstimatedCompletionDate,
    IsArchived,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Objectives {
    Table,
    Id,
    ProjectId,
    Name,
    CurrentStep,
    JourneyStatus,
    BrainstormData,
    ChooseData,
    ObjectivesData,
    TargetCompletionDate,
    ActualCompletionDate,
    IsArchived,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum ObjectiveLocks {
    Table,
    ObjectiveId,
    TeamMemberId,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
pub enum Tasks {
    Table,
    Id,
    ObjectiveId,
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum TaskAssignments {
    Table,
    TaskId,
    TeamMemberId,
    AssignedAt,
}

#[derive(Iden)]
pub enum RrgtPlans {
    Table,
    Id,
    TaskId,
    TeamMemberId,
    ProjectId,
    ObjectiveId,
    MaxColumnIndex,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum RrgtSubtasks {
    Table,
    Id,
    PlanId,
    ColumnIndex,
    Text,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum RrgtRabbits {
    Table,
    PlanId,
    CurrentColumnIndex,
    UpdatedAt,
}

#[derive(Iden)]
pub enum DialStates {
    Table,
    TeamMemberId,
    LeftPlanId,
    LeftColumnIndex,
    LeftText,
    IsLeftPrivate,
    RightPlanId,
    RightColumnIndex,
    IsRightPrivate,
    SelectedSlot,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Touchbases {
    Table,
    Id,
    ObjectiveId,
    TeamMemberId,
    TouchbaseDate,
    Responses,
    CreatedAt,
}

#[derive(Iden)]
pub enum JourneySessions {
    Table,
    Id,
    SessionId,
    Module,
    StepData,
    CompletedSteps,
    CurrentStep,
    IsCompleted,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum JourneyTasks {
    Table,
    Id,
    SessionId,
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}
