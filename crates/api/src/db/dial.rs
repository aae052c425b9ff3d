//! Dial state query builders.

use sea_query::{Expr, Query, SqliteQueryBuilder};

use super::tables::{DialStates, RrgtPlans, Tasks};
use super::Built;

/// A member's dial state, in row-mapper order:
/// (team_member_id, left_plan_id, left_column_index, left_text,
///  is_left_private, right_plan_id, right_column_index, is_right_private,
///  selected_slot, updated_at).
pub fn get_for_member(team_member_id: &str) -> Built {
    Query::select()
        .columns([
            DialStates::TeamMemberId,
            DialStates::LeftPlanId,
            DialStates::LeftColumnIndex,
            DialStates::LeftText,
            DialStates::IsLeftPrivate,
            DialStates::RightPlanId,
            DialStates::RightColumnIndex,
            DialStates::IsRightPrivate,
            DialStates::SelectedSlot,
            DialStates::UpdatedAt,
        ])
        .from(DialStates::Table)
        .and_where(Expr::col(DialStates::TeamMemberId).eq(team_member_id))
        .build(SqliteQueryBuilder)
}

/// Full-state upsert of a member's dial.
#[allow(clippy::too_many_arguments)]
pub fn upsert(
    team_member_id: &str,
    left_plan_id: Option<&str>,
    left_column_index: Option<i64>,
    left_text: Option<&str>,
    is_left_private: bool,
    right_plan_id: Option<&str>,
    right_column_index: Option<i64>,
    is_right_private: bool,
    selected_slot: Option<&str>,
) -> Built {
    let sql = "INSERT INTO dial_states (team_member_id, left_plan_id, left_column_index, \
               left_text, is_left_private, right_plan_id, right_column_index, \
               is_right_private, selected_slot) \
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
               ON CONFLICT(team_member_id) DO UPDATE SET \
               left_plan_id = excluded.left_plan_id, \
               left_column_index = excluded.left_column_index, \
               left_text = excluded.left_text, \
               is_left_private = excluded.is_left_private, \
               right_plan_id = excluded.right_plan_id, \
               right_column_index = excluded.right_column_index, \
               is_right_private = excluded.is_right_private, \
               selected_slot = excluded.selected_slot, \
               updated_at = datetime('now')"
        .to_string();
    let values = sea_query::Values(vec![
        team_member_id.into(),
        left_plan_id.map(|s| s.to_string()).into(),
        left_column_index.into(),
        left_text.map(|s| s.to_string()).into(),
        is_left_private.into(),
        right_plan_id.map(|s| s.to_string()).into(),
        right_column_index.into(),
        is_right_private.into(),
        selected_slot.map(|s| s.to_string()).into(),
    ]);
    (sql, values)
}

/// Task title behind a plan, scoped to the plan's owner: (title).
pub fn task_title_for_plan(plan_id: &str, team_member_id: &str) -> Built {
    Query::select()
        .column((Tasks::Table, Tasks::Title))
        .from(RrgtPlans::Table)
        .inner_join(
            Tasks::Table,
            Expr::col((Tasks::Table, Tasks::Id)).equals((RrgtPlans::Table, RrgtPlans::TaskId)),
        )
        .and_where(Expr::col((RrgtPlans::Table, RrgtPlans::Id)).eq(plan_id))
        .and_where(Expr::col((RrgtPlans::Table, RrgtPlans::TeamMemberId)).eq(team_member_id))
        .build(SqliteQueryBuilder)
}
