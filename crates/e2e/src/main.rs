//! Standalone E2E runner: runs every spec in parallel against a server.
//!
//!   cargo run -p arrowhead-e2e -- [filter]

use std::sync::Arc;

use arrowhead_e2e::{client::TestContext, runner};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arrowhead_e2e=info".into()),
        )
        .init();

    let base_url = std::env::var("BASE_URL")
        .or_else(|_| std::env::var("ARROWHEAD_BASE_URL"))
        .unwrap_or_else(|_| "http://localhost:3000".into());
    let filter = std::env::args().nth(1);

    println!("running E2E suite against {base_url}");
    let ctx = Arc::new(TestContext::new(base_url));
    let suite = runner::run_all(ctx, filter.as_deref()).await;

    for result in &suite.results {
        let status = if result.passed { "PASS" } else { "FAIL" };
        println!("{status} {} ({:?})", result.name, result.duration);
        if let Some(ref error) = result.error {
            println!("     {error}");
        }
    }
    println!("{} passed, {} failed, {} total", suite.passed(), suite.failed(), suite.total());

    if suite.failed() > 0 {
        std::process::exit(1);
    }
}
