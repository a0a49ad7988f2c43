//! Managed chromedriver process.
//!
//! Starts the server binary found on PATH, polls its status endpoint
//! until it reports ready, and shuts it down when the run is over. An
//! externally managed server can be attached instead via config.

use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::config::DriverConfig;
use crate::error::{JarvisError, Result};

/// How often the readiness probe runs.
const PROBE_INTERVAL: Duration = Duration::from_millis(200);

/// Probe attempts before giving up on the server (~5s).
const MAX_PROBE_ATTEMPTS: u32 = 25;

/// A chromedriver process owned by this run.
#[derive(Debug)]
pub struct DriverServer {
    process: Child,
    url: String,
}

impl DriverServer {
    /// Launch the configured binary and wait until its status endpoint
    /// reports ready.
    pub async fn launch(config: &DriverConfig) -> Result<Self> {
        let binary = which::which(&config.binary)
            .map_err(|_| JarvisError::DriverNotFound(config.binary.clone()))?;
        let url = format!("http://127.0.0.1:{}", config.port);

        debug!(target = "jarvis", binary = %binary.display(), port = config.port, "starting webdriver server");
        let mut child = Command::new(&binary)
            .arg(format!("--port={}", config.port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                JarvisError::DriverLaunch(format!(
                    "failed to start {}: {err}",
                    binary.display()
                ))
            })?;

        let mut last_error = String::new();
        for _ in 0..MAX_PROBE_ATTEMPTS {
            tokio::time::sleep(PROBE_INTERVAL).await;

            if let Ok(Some(status)) = child.try_wait() {
                return Err(JarvisError::DriverLaunch(format!(
                    "{} exited before becoming ready (status: {status})",
                    config.binary
                )));
            }

            match probe_ready(&url).await {
                Ok(true) => {
                    info!(target = "jarvis", %url, "webdriver server ready");
                    return Ok(DriverServer { process: child, url });
                }
                Ok(false) => last_error = "server reported not ready".to_string(),
                Err(err) => last_error = err.to_string(),
            }
        }

        let _ = child.kill().await;
        Err(JarvisError::DriverLaunch(format!(
            "{} did not become ready: {last_error}",
            config.binary
        )))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stop the server process.
    pub async fn shutdown(mut self) -> Result<()> {
        self.process
            .kill()
            .await
            .map_err(|err| JarvisError::DriverLaunch(format!("failed to stop webdriver server: {err}")))?;
        let _ = self.process.wait().await;
        debug!(target = "jarvis", "webdriver server stopped");
        Ok(())
    }
}

/// Resolve the server to use: attach to a configured external URL, or
/// launch and own a local process.
pub async fn acquire(config: &DriverConfig) -> Result<(String, Option<DriverServer>)> {
    if let Some(url) = &config.url {
        debug!(target = "jarvis", %url, "attaching to external webdriver server");
        return Ok((url.clone(), None));
    }
    let server = DriverServer::launch(config).await?;
    Ok((server.url().to_string(), Some(server)))
}

async fn probe_ready(url: &str) -> Result<bool> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(400))
        .build()
        .map_err(|err| JarvisError::DriverLaunch(format!("failed to build probe client: {err}")))?;
    let response = client
        .get(format!("{url}/status"))
        .send()
        .await
        .map_err(|err| JarvisError::DriverLaunch(format!("status probe failed: {err}")))?;
    let payload: Value = response
        .json()
        .await
        .map_err(|err| JarvisError::DriverLaunch(format!("status probe returned invalid json: {err}")))?;
    Ok(payload
        .pointer("/value/ready")
        .and_then(Value::as_bool)
        .unwrap_or(false))
}
