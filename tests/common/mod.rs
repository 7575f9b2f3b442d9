//! Shared harness for end-to-end tests: spawns the built server binary on
//! a free port and hands back a reqwest client pointed at it.

use std::process::{Child, Command};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

pub struct TestServer {
    child: Child,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Start `target/debug/blog-api` on an unused port and wait for the
    /// health endpoint to answer. Requires `cargo build` to have run and
    /// a reachable Postgres (DATABASE_URL).
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().ok_or_else(|| anyhow!("no free port"))?;
        let base_url = format!("http://127.0.0.1:{port}");

        let child = Command::new(env!("CARGO_BIN_EXE_blog-api"))
            .env("PORT", port.to_string())
            .env("RUST_LOG", "warn")
            .spawn()
            .context("failed to spawn server binary")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        let server = Self {
            child,
            base_url,
            client,
        };
        server.wait_until_healthy().await?;
        Ok(server)
    }

    async fn wait_until_healthy(&self) -> Result<()> {
        for _ in 0..50 {
            if let Ok(response) = self
                .client
                .get(format!("{}/health", self.base_url))
                .send()
                .await
            {
                if response.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Err(anyhow!("server did not become healthy in time"))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
