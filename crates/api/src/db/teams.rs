//! Team + member query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use super::tables::{TeamMembers, Teams, Users};
use super::Built;

// ── Team queries ──────────────────────────────────────────────────────────

/// Column list for team SELECT queries.
fn team_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column((Teams::Table, Teams::Id))
        .column((Teams::Table, Teams::Name))
        .column((Teams::Table, Teams::Description))
        .column((Teams::Table, Teams::CreatedBy))
        .column((Teams::Table, Teams::CreatedAt))
}

/// INSERT a new team.
pub fn insert(id: &str, name: &str, description: Option<&str>, created_by: &str) -> Built {
    Query::insert()
        .into_table(Teams::Table)
        .columns([Teams::Id, Teams::Name, Teams::Description, Teams::CreatedBy])
        .values_panic([
            id.into(),
            name.into(),
            description.map(|s| s.to_string()).into(),
            created_by.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// SELECT a single team by id.
pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    team_columns(&mut q);
    q.from(Teams::Table)
        .and_where(Expr::col((Teams::Table, Teams::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// Check if a team exists.
pub fn exists(id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Teams::Table)
        .and_where(Expr::col(Teams::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Update a team's name.
pub fn update_name(id: &str, name: &str) -> Built {
    Query::update()
        .table(Teams::Table)
        .value(Teams::Name, name)
        .and_where(Expr::col(Teams::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Update a team's description.
pub fn update_description(id: &str, description: &str) -> Built {
    Query::update()
        .table(Teams::Table)
        .value(Teams::Description, description)
        .and_where(Expr::col(Teams::Id).eq(id))
        .build(SqliteQueryBuilder)
}

// ── Member queries ────────────────────────────────────────────────────────

/// INSERT a team member.
pub fn member_insert(id: &str, team_id: &str, user_id: &str, role: &str) -> Built {
    Query::insert()
        .into_table(TeamMembers::Table)
        .columns([
            TeamMembers::Id,
            TeamMembers::TeamId,
            TeamMembers::UserId,
            TeamMembers::Role,
        ])
        .values_panic([id.into(), team_id.into(), user_id.into(), role.into()])
        .build(SqliteQueryBuilder)
}

/// DELETE a team member by member id within a team.
pub fn member_delete(team_id: &str, member_id: &str) -> Built {
    Query::delete()
        .from_table(TeamMembers::Table)
        .and_where(Expr::col(TeamMembers::TeamId).eq(team_id))
        .and_where(Expr::col(TeamMembers::Id).eq(member_id))
        .build(SqliteQueryBuilder)
}

/// List members of a team (joins users for display name/email):
/// (member id, user_id, display_name, email, role, joined_at).
pub fn member_list(team_id: &str) -> Built {
    Query::select()
        .column((TeamMembers::Table, TeamMembers::Id))
        .column((TeamMembers::Table, TeamMembers::UserId))
        .column((Users::Table, Users::DisplayName))
        .column((Users::Table, Users::Email))
        .column((TeamMembers::Table, TeamMembers::Role))
        .column((TeamMembers::Table, TeamMembers::JoinedAt))
        .from(TeamMembers::Table)
        .inner_join(
            Users::Table,
            Expr::col((Users::Table, Users::Id)).equals((TeamMembers::Table, TeamMembers::UserId)),
        )
        .and_where(Expr::col((TeamMembers::Table, TeamMembers::TeamId)).eq(team_id))
        .order_by((TeamMembers::Table, TeamMembers::JoinedAt), Order::Asc)
        .build(SqliteQueryBuilder)
}

/// The member row of a user, if any: (member id, team_id, role).
///
/// A user belongs to at most one team, so no team filter is needed.
pub fn member_for_user(user_id: &str) -> Built {
    Query::select()
        .columns([TeamMembers::Id, TeamMembers::TeamId, TeamMembers::Role])
        .from(TeamMembers::Table)
        .and_where(Expr::col(TeamMembers::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// A member row by id: (member id, team_id, user_id, role).
pub fn member_by_id(member_id: &str) -> Built {
    Query::select()
        .columns([
            TeamMembers::Id,
            TeamMembers::TeamId,
            TeamMembers::UserId,
            TeamMembers::Role,
        ])
        .from(TeamMembers::Table)
        .and_where(Expr::col(TeamMembers::Id).eq(member_id))
        .build(SqliteQueryBuilder)
}

/// A member's display name (joins users).
pub fn member_display_name(member_id: &str) -> Built {
    Query::select()
        .column((Users::Table, Users::DisplayName))
        .from(TeamMembers::Table)
        .inner_join(
            Users::Table,
            Expr::col((Users::Table, Users::Id)).equals((TeamMembers::Table, TeamMembers::UserId)),
        )
        .and_where(Expr::col((TeamMembers::Table, TeamMembers::Id)).eq(member_id))
        .build(SqliteQueryBuilder)
}

/// Update a member's role.
pub fn member_update_role(team_id: &str, member_id: &str, role: &str) -> Built {
    Query::update()
        .table(TeamMembers::Table)
        .value(TeamMembers::Role, role)
        .and_where(Expr::col(TeamMembers::TeamId).eq(team_id))
        .and_where(Expr::col(TeamMembers::Id).eq(member_id))
        .build(SqliteQueryBuilder)
}

/// Count members in a team.
pub fn member_count(team_id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(TeamMembers::Table)
        .and_where(Expr::col(TeamMembers::TeamId).eq(team_id))
        .build(SqliteQueryBuilder)
}

/// Count members of a team holding `role`.
pub fn member_count_with_role(team_id: &str, role: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(TeamMembers::Table)
        .and_where(Expr::col(TeamMembers::TeamId).eq(team_id))
        .and_where(Expr::col(TeamMembers::Role).eq(role))
        .build(SqliteQueryBuilder)
}
