mod error;
mod routes;
mod storage;

use axum::{
    extract::FromRef,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use storage::Db;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: AppConfig,
}

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub jwt_secret: String,
    pub allowed_origins: Vec<String>,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Parse the CORS allow-list: `ALLOWED_ORIGINS` (comma-separated) plus the
/// server's own base URL. Trailing slashes are stripped so exact-match
/// comparison works.
fn parse_allowed_origins(base_url: &str) -> Vec<String> {
    let mut origins: Vec<String> = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let base = base_url.trim_end_matches('/').to_string();
    if !base.is_empty() && !origins.contains(&base) {
        origins.push(base);
    }
    origins
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arrowhead_server=info,tower_http=info".into()),
        )
        .init();

    // Data directory
    let data_dir = std::env::var("ARROWHEAD_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    tracing::info!("data directory: {}", data_dir.display());

    // Initialize database
    let db = storage::init_db(&data_dir)?;
    tracing::info!("database initialized");

    let base_url = std::env::var("BASE_URL")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| {
            std::env::var("ARROWHEAD_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "http://localhost:3000".into());

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_default();
    if jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET not set — authenticated endpoints will reject all requests");
    }

    let allowed_origins = parse_allowed_origins(&base_url);
    tracing::info!("CORS allow-list: {allowed_origins:?}");

    let config = AppConfig {
        base_url: base_url.clone(),
        jwt_secret,
        allowed_origins,
    };

    let state = AppState {
        db,
        config: config.clone(),
    };

    // Build API routes
    let api = Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/password", put(routes::auth::change_password))
        .route("/auth/profile", get(routes::auth::profile))
        // Teams
        .route("/teams", post(routes::teams::create_team))
        .route(
            "/teams/{id}",
            get(routes::teams::get_team).put(routes::teams::update_team),
        )
        // Team members
        .route(
            "/teams/{id}/members",
            get(routes::teams::list_members).post(routes::teams::add_member),
        )
        .route(
            "/teams/{id}/members/{member_id}",
            put(routes::teams::update_member).delete(routes::teams::remove_member),
        )
        // Projects
        .route(
            "/teams/{id}/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        // Objectives
        .route(
            "/projects/{id}/objectives",
            get(routes::objectives::list_objectives).post(routes::objectives::create_objective),
        )
        .route(
            "/objectives/{id}",
            get(routes::objectives::get_objective)
                .put(routes::objectives::update_objective)
                .delete(routes::objectives::delete_objective),
        )
        .route("/objectives/{id}/resume", get(routes::objectives::resume))
        .route(
            "/objectives/{id}/lock",
            post(routes::objectives::acquire_lock).delete(routes::objectives::release_lock),
        )
        // Tasks (Scoreboard)
        .route(
            "/objectives/{id}/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/objectives/{id}/tasks/reorder",
            put(routes::tasks::reorder_tasks),
        )
        .route(
            "/tasks/{id}",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        // Touchbases
        .route(
            "/objectives/{id}/touchbases",
            get(routes::touchbases::list_touchbases).post(routes::touchbases::create_touchbase),
        )
        // RRGT
        .route("/rrgt/mine", get(routes::rrgt::my_rrgt))
        .route("/rrgt/{member_id}", get(routes::rrgt::member_rrgt))
        .route(
            "/rrgt/plans/{plan_id}/rabbit",
            put(routes::rrgt::update_rabbit),
        )
        .route(
            "/rrgt/plans/{plan_id}/subtasks",
            put(routes::rrgt::upsert_subtask),
        )
        // Dial
        .route(
            "/dial/mine",
            get(routes::dial::my_dial).put(routes::dial::update_dial),
        )
        // Journey sessions (guest flow, unauthenticated)
        .route(
            "/journey/sessions",
            post(routes::journeys::create_session),
        )
        .route(
            "/journey/sessions/{session_id}",
            get(routes::journeys::get_session).put(routes::journeys::update_session),
        )
        .route(
            "/journey/sessions/{session_id}/export",
            get(routes::journeys::export_session),
        )
        .route(
            "/journey/tasks",
            get(routes::journeys::list_tasks).post(routes::journeys::create_task),
        )
        .route(
            "/journey/tasks/{id}",
            put(routes::journeys::update_task).delete(routes::journeys::delete_task),
        );

    // Build main router
    let mut app = Router::new().nest("/api", api);

    // Serve static files from web build if present
    let web_dir = std::env::var("ARROWHEAD_WEB_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("web/build"));
    if web_dir.exists() {
        tracing::info!("serving static files from {}", web_dir.display());
        let index_html = web_dir.join("index.html");
        app = app.fallback_service(ServeDir::new(&web_dir).fallback(ServeFile::new(index_html)));
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state);

    tracing::info!("starting server at {base_url}");

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_allowed_origins;

    #[test]
    fn allow_list_includes_base_url_once() {
        unsafe { std::env::remove_var("ALLOWED_ORIGINS") };
        let origins = parse_allowed_origins("http://localhost:3000/");
        assert_eq!(origins, vec!["http://localhost:3000".to_string()]);
    }
}
