//! Binds every spec to a `#[tokio::test]` against a running server.
//!
//! Start a server (JWT_SECRET set) and point BASE_URL at it:
//!   BASE_URL=http://localhost:3000 cargo test -p arrowhead-e2e

use arrowhead_e2e::client::TestContext;

fn get_ctx() -> TestContext {
    let base_url = std::env::var("BASE_URL")
        .or_else(|_| std::env::var("ARROWHEAD_BASE_URL"))
        .unwrap_or_else(|_| "http://localhost:3000".into());
    TestContext::new(base_url)
}

macro_rules! e2e_test {
    ($module:ident :: $name:ident) => {
        #[tokio::test]
        async fn $name() {
            let ctx = get_ctx();
            arrowhead_e2e::specs::$module::$name(&ctx).await.unwrap();
        }
    };
}

arrowhead_e2e::for_each_spec!(e2e_test);
