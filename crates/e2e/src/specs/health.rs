use anyhow::{ensure, Result};

use crate::client::TestContext;

/// GET /api/health → 200 with status "ok".
pub async fn health_check(ctx: &TestContext) -> Result<()> {
    let resp = ctx.get("/health").await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let body: serde_json::Value = resp.json().await?;
    ensure!(body["status"] == "ok");
    ensure!(body["version"].is_string());
    Ok(())
}
