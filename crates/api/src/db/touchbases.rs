//! Touchbase query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::{TeamMembers, Touchbases, Users};
use super::Built;

/// INSERT a touchbase record.
pub fn insert(
    id: &str,
    objective_id: &str,
    team_member_id: &str,
    touchbase_date: &str,
    responses_json: &str,
) -> Built {
    Query::insert()
        .into_table(Touchbases::Table)
        .columns([
            Touchbases::Id,
            Touchbases::ObjectiveId,
            Touchbases::TeamMemberId,
            Touchbases::TouchbaseDate,
            Touchbases::Responses,
        ])
        .values_panic([
            id.into(),
            objective_id.into(),
            team_member_id.into(),
            touchbase_date.into(),
            responses_json.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// An objective's touchbase history, newest first, joined for display names:
/// (id, objective_id, team_member_id, display_name, touchbase_date,
///  responses, created_at).
pub fn list_for_objective(objective_id: &str) -> Built {
    Query::select()
        .column((Touchbases::Table, Touchbases::Id))
        .column((Touchbases::Table, Touchbases::ObjectiveId))
        .column((Touchbases::Table, Touchbases::TeamMemberId))
        .column((Users::Table, Users::DisplayName))
        .column((Touchbases::Table, Touchbases::TouchbaseDate))
        .column((Touchbases::Table, Touchbases::Responses))
        .column((Touchbases::Table, Touchbases::CreatedAt))
        .from(Touchbases::Table)
        .inner_join(
            TeamMembers::Table,
            Expr::col((TeamMembers::Table, TeamMembers::Id))
                .equals((Touchbases::Table, Touchbases::TeamMemberId)),
        )
        .inner_join(
            Users::Table,
            Expr::col((Users::Table, Users::Id)).equals((TeamMembers::Table, TeamMembers::UserId)),
        )
        .and_where(Expr::col((Touchbases::Table, Touchbases::ObjectiveId)).eq(objective_id))
        .order_by((Touchbases::Table, Touchbases::TouchbaseDate), Order::Desc)
        .order_by((Touchbases::Table, Touchbases::CreatedAt), Order::Desc)
        .build(SqliteQueryBuilder)
}
