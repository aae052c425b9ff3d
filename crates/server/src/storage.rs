use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arrowhead_api::db::{migrations, Built};
use arrowhead_api::{
    JourneySessionResponse, JourneyTaskResponse, MemberResponse, ObjectiveResponse,
    ProjectResponse, StepAnswers, SubtaskResponse, TaskResponse, TeamResponse, TouchbaseResponse,
};

/// Shared database state
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
    #[allow(dead_code)]
    data_dir: PathBuf,
}

impl Db {
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }
}

/// Initialize the database: open connection, enable WAL, run migrations
pub fn init_db(data_dir: &Path) -> Result<Db> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("arrowhead.db");
    let conn = Connection::open(&db_path).context("opening SQLite database")?;
    init_conn(&conn)?;

    Ok(Db {
        conn: Arc::new(Mutex::new(conn)),
        data_dir: data_dir.to_path_buf(),
    })
}

/// In-memory database for tests.
#[cfg(test)]
pub fn init_test_db() -> Result<Db> {
    let conn = Connection::open_in_memory()?;
    init_conn(&conn)?;
    Ok(Db {
        conn: Arc::new(Mutex::new(conn)),
        data_dir: PathBuf::from(":memory:"),
    })
}

fn init_conn(conn: &Connection) -> Result<()> {
    // WAL for concurrent readers; foreign keys drive the cascade rules.
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    run_migrations(conn)
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in migrations::MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !already_applied {
            conn.execute_batch(sql)
                .with_context(|| format!("running migration {name}"))?;
            conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
            tracing::info!("Applied migration: {name}");
        }
    }

    Ok(())
}

// ── sea-query → rusqlite bridge ─────────────────────────────────────────────

fn to_sql_value(v: sea_query::Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;
    use sea_query::Value as Sq;
    match v {
        Sq::Bool(b) => b.map(|b| Sql::Integer(b as i64)).unwrap_or(Sql::Null),
        Sq::TinyInt(x) => x.map(|x| Sql::Integer(x as i64)).unwrap_or(Sql::Null),
        Sq::SmallInt(x) => x.map(|x| Sql::Integer(x as i64)).unwrap_or(Sql::Null),
        Sq::Int(x) => x.map(|x| Sql::Integer(x as i64)).unwrap_or(Sql::Null),
        Sq::BigInt(x) => x.map(Sql::Integer).unwrap_or(Sql::Null),
        Sq::TinyUnsigned(x) => x.map(|x| Sql::Integer(x as i64)).unwrap_or(Sql::Null),
        Sq::SmallUnsigned(x) => x.map(|x| Sql::Integer(x as i64)).unwrap_or(Sql::Null),
        Sq::Unsigned(x) => x.map(|x| Sql::Integer(x as i64)).unwrap_or(Sql::Null),
        Sq::BigUnsigned(x) => x
            .map(|x| Sql::Integer(i64::try_from(x).unwrap_or(i64::MAX)))
            .unwrap_or(Sql::Null),
        Sq::Float(x) => x.map(|x| Sql::Real(x as f64)).unwrap_or(Sql::Null),
        Sq::Double(x) => x.map(Sql::Real).unwrap_or(Sql::Null),
        Sq::String(s) => s.map(|s| Sql::Text(*s)).unwrap_or(Sql::Null),
        Sq::Char(c) => c.map(|c| Sql::Text(c.to_string())).unwrap_or(Sql::Null),
        Sq::Bytes(b) => b.map(|b| Sql::Blob(*b)).unwrap_or(Sql::Null),
        _ => Sql::Null,
    }
}

fn bind(values: sea_query::Values) -> Vec<rusqlite::types::Value> {
    values.0.into_iter().map(to_sql_value).collect()
}

/// Execute a built statement, returning the affected row count.
pub fn sq_execute(conn: &Connection, (sql, values): Built) -> rusqlite::Result<usize> {
    conn.execute(&sql, rusqlite::params_from_iter(bind(values)))
}

/// Run a built SELECT expected to yield one row.
pub fn sq_query_row<T, F>(conn: &Connection, (sql, values): Built, f: F) -> rusqlite::Result<T>
where
    F: FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    conn.query_row(&sql, rusqlite::params_from_iter(bind(values)), f)
}

/// Run a built SELECT, collecting every mappable row.
pub fn sq_query_map<T, F>(conn: &Connection, (sql, values): Built, f: F) -> rusqlite::Result<Vec<T>>
where
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(bind(values)), f)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

// ── Row mappers ─────────────────────────────────────────────────────────────

/// Parse a TEXT column into a domain enum, surfacing bad rows as conversion
/// failures instead of panics.
fn parse_col<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a JSON TEXT column into step answers; bad JSON maps to empty.
fn answers_col(raw: String) -> StepAnswers {
    serde_json::from_str(&raw).unwrap_or_default()
}

pub fn team_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TeamResponse> {
    Ok(TeamResponse {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_by: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn member_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemberResponse> {
    Ok(MemberResponse {
        id: row.get(0)?,
        user_id: row.get(1)?,
        display_name: row.get(2)?,
        email: row.get(3)?,
        role: parse_col(4, row.get::<_, String>(4)?)?,
        joined_at: row.get(5)?,
    })
}

pub fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectResponse> {
    Ok(ProjectResponse {
        id: row.get(0)?,
        team_id: row.get(1)?,
        name: row.get(2)?,
        vision: row.get(3)?,
        completion_status: parse_col(4, row.get::<_, String>(4)?)?,
        estimated_completion_date: row.get(5)?,
        is_archived: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn objective_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ObjectiveResponse> {
    Ok(ObjectiveResponse {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        current_step: row.get(3)?,
        journey_status: parse_col(4, row.get::<_, String>(4)?)?,
        target_completion_date: row.get(5)?,
        actual_completion_date: row.get(6)?,
        is_archived: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Maps the three step-data columns from `db::objectives::get_step_data`.
pub fn step_data_from_row(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<(StepAnswers, StepAnswers, StepAnswers)> {
    Ok((
        answers_col(row.get::<_, String>(0)?),
        answers_col(row.get::<_, String>(1)?),
        answers_col(row.get::<_, String>(2)?),
    ))
}

/// Maps a task row; `assigned_members` starts empty and is filled by the
/// caller.
pub fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskResponse> {
    Ok(TaskResponse {
        id: row.get(0)?,
        objective_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: parse_col(4, row.get::<_, String>(4)?)?,
        priority: parse_col(5, row.get::<_, String>(5)?)?,
        due_date: row.get(6)?,
        sort_order: row.get(7)?,
        assigned_members: Vec::new(),
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn journey_session_from_row(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<JourneySessionResponse> {
    let completed_steps: Vec<u32> =
        serde_json::from_str(&row.get::<_, String>(4)?).unwrap_or_default();
    Ok(JourneySessionResponse {
        id: row.get(0)?,
        session_id: row.get(1)?,
        module: parse_col(2, row.get::<_, String>(2)?)?,
        step_data: answers_col(row.get::<_, String>(3)?),
        completed_steps,
        current_step: row.get(5)?,
        is_completed: row.get(6)?,
        completed_at: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn journey_task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JourneyTaskResponse> {
    Ok(JourneyTaskResponse {
        id: row.get(0)?,
        session_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: parse_col(4, row.get::<_, String>(4)?)?,
        priority: parse_col(5, row.get::<_, String>(5)?)?,
        due_date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn subtask_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubtaskResponse> {
    Ok(SubtaskResponse {
        id: row.get(0)?,
        plan_id: row.get(1)?,
        column_index: row.get(2)?,
        text: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

pub fn touchbase_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TouchbaseResponse> {
    let responses = serde_json::from_str(&row.get::<_, String>(5)?).unwrap_or_default();
    Ok(TouchbaseResponse {
        id: row.get(0)?,
        objective_id: row.get(1)?,
        team_member_id: row.get(2)?,
        team_member_name: row.get(3)?,
        touchbase_date: row.get(4)?,
        responses,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrowhead_api::db;

    #[test]
    fn migrations_apply_once() {
        let db = init_test_db().unwrap();
        let conn = db.conn();
        // A second run must be a no-op.
        run_migrations(&conn).unwrap();
        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, db::migrations::MIGRATIONS.len() as i64);
    }

    #[test]
    fn bridge_binds_options_and_bools() {
        let db = init_test_db().unwrap();
        let conn = db.conn();
        sq_execute(
            &conn,
            db::users::insert("u1", "a@b.co", "Alice", "hash", "salt"),
        )
        .unwrap();
        sq_execute(&conn, db::teams::insert("t1", "Team", None, "u1")).unwrap();
        sq_execute(&conn, db::teams::member_insert("m1", "t1", "u1", "Account Owner")).unwrap();

        let team = sq_query_row(&conn, db::teams::get_by_id("t1"), team_from_row).unwrap();
        assert_eq!(team.name, "Team");
        assert_eq!(team.description, None);

        let count: i64 = sq_query_row(&conn, db::teams::member_count("t1"), |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn one_team_per_user_is_enforced() {
        let db = init_test_db().unwrap();
        let conn = db.conn();
        sq_execute(
            &conn,
            db::users::insert("u1", "a@b.co", "Alice", "hash", "salt"),
        )
        .unwrap();
        sq_execute(&conn, db::teams::insert("t1", "One", None, "u1")).unwrap();
        sq_execute(&conn, db::teams::insert("t2", "Two", None, "u1")).unwrap();
        sq_execute(&conn, db::teams::member_insert("m1", "t1", "u1", "Account Owner")).unwrap();
        let second = sq_execute(&conn, db::teams::member_insert("m2", "t2", "u1", "Team Member"));
        assert!(second.is_err(), "unique user_id constraint must reject");
    }
}
