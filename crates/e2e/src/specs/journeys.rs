use anyhow::{ensure, Result};
use uuid::Uuid;

use arrowhead_api::JourneySessionResponse;

use crate::client::TestContext;

fn new_session_id() -> String {
    format!("guest-{}", Uuid::new_v4().simple())
}

/// Guest sessions create, fetch, and save without any authentication.
pub async fn guest_session_round_trips(ctx: &TestContext) -> Result<()> {
    let session_id = new_session_id();

    let resp = ctx
        .post_json(
            "/journey/sessions",
            &serde_json::json!({ "session_id": session_id, "module": "brainstorm" }),
        )
        .await?;
    ensure!(resp.status() == 201, "expected 201, got {}", resp.status());
    let session: JourneySessionResponse = resp.json().await?;
    ensure!(session.current_step == 1, "brainstorm starts at step 1");
    ensure!(!session.is_completed);

    let resp = ctx
        .put_json(
            &format!("/journey/sessions/{session_id}"),
            &serde_json::json!({
                "step_data": { "step1_imitate": "study the incumbents" },
                "completed_steps": [1],
                "current_step": 2,
            }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    let session: JourneySessionResponse = resp.json().await?;
    ensure!(session.step_data.get("step1_imitate") == Some("study the incumbents"));
    ensure!(session.completed_steps == vec![1]);
    ensure!(session.current_step == 2);

    // Completing stamps completed_at.
    let resp = ctx
        .put_json(
            &format!("/journey/sessions/{session_id}"),
            &serde_json::json!({ "is_completed": true }),
        )
        .await?;
    ensure!(resp.status() == 200);
    let session: JourneySessionResponse = resp.json().await?;
    ensure!(session.is_completed);
    ensure!(session.completed_at.is_some());
    Ok(())
}

/// The same session_id cannot be created twice → 409.
pub async fn duplicate_session_id_conflict(ctx: &TestContext) -> Result<()> {
    let session_id = new_session_id();
    let body = serde_json::json!({ "session_id": session_id, "module": "choose" });

    let resp = ctx.post_json("/journey/sessions", &body).await?;
    ensure!(resp.status() == 201);

    let resp = ctx.post_json("/journey/sessions", &body).await?;
    ensure!(resp.status() == 409, "expected 409, got {}", resp.status());
    Ok(())
}

/// The export endpoint bundles the session with its tasks.
pub async fn export_bundles_session_and_tasks(ctx: &TestContext) -> Result<()> {
    let session_id = new_session_id();

    let resp = ctx
        .post_json(
            "/journey/sessions",
            &serde_json::json!({ "session_id": session_id, "module": "objectives" }),
        )
        .await?;
    ensure!(resp.status() == 201);

    let resp = ctx
        .post_json(
            "/journey/tasks",
            &serde_json::json!({ "session_id": session_id, "title": "write the plan" }),
        )
        .await?;
    ensure!(resp.status() == 201, "expected 201, got {}", resp.status());

    let resp = ctx
        .get(&format!("/journey/sessions/{session_id}/export"))
        .await?;
    ensure!(resp.status() == 200);
    let export: serde_json::Value = resp.json().await?;
    ensure!(export["export_type"] == "objectives");
    ensure!(export["session"]["session_id"] == session_id.as_str());
    ensure!(export["tasks"].as_array().is_some_and(|t| t.len() == 1));
    Ok(())
}

/// Guest task CRUD against /journey/tasks.
pub async fn guest_tasks_crud(ctx: &TestContext) -> Result<()> {
    let session_id = new_session_id();
    let resp = ctx
        .post_json(
            "/journey/sessions",
            &serde_json::json!({ "session_id": session_id, "module": "brainstorm" }),
        )
        .await?;
    ensure!(resp.status() == 201);

    // Unknown session → 404.
    let resp = ctx
        .post_json(
            "/journey/tasks",
            &serde_json::json!({ "session_id": "missing", "title": "orphan" }),
        )
        .await?;
    ensure!(resp.status() == 404, "expected 404, got {}", resp.status());

    let resp = ctx
        .post_json(
            "/journey/tasks",
            &serde_json::json!({ "session_id": session_id, "title": "sketch ideas" }),
        )
        .await?;
    ensure!(resp.status() == 201);
    let task: serde_json::Value = resp.json().await?;
    let task_id = task["id"].as_str().unwrap_or_default().to_string();

    let resp = ctx
        .put_json(
            &format!("/journey/tasks/{task_id}"),
            &serde_json::json!({ "status": "complete", "priority": "high" }),
        )
        .await?;
    ensure!(resp.status() == 200);
    let task: serde_json::Value = resp.json().await?;
    ensure!(task["status"] == "complete");
    ensure!(task["priority"] == "high");

    let resp = ctx
        .get(&format!("/journey/tasks?session_id={session_id}"))
        .await?;
    ensure!(resp.status() == 200);
    let listed: serde_json::Value = resp.json().await?;
    ensure!(listed["tasks"].as_array().is_some_and(|t| t.len() == 1));

    let resp = ctx.delete(&format!("/journey/tasks/{task_id}")).await?;
    ensure!(resp.status() == 204, "expected 204, got {}", resp.status());
    Ok(())
}
