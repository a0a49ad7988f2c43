//! Saved-session management: interactive login capture and inspection.

use std::time::Duration;

use jarvis::PortalPage;
use tracing::info;

use crate::browser::{PortalSession, StoredCookie, driver};
use crate::config::Config;
use crate::error::{JarvisError, Result};
use crate::output::{AuthData, CookieListData, OutputFormat, ResultBuilder, print_result};

/// Interactive login: open a headed browser on the portal, let the
/// operator log in, then capture the session cookies.
pub async fn login(timeout_secs: u64, config: &Config, format: OutputFormat) -> Result<()> {
    let (server_url, server) = driver::acquire(&config.driver).await?;
    // Manual login needs a visible window whatever the config says.
    let session = match PortalSession::connect(&server_url, false).await {
        Ok(session) => session,
        Err(err) => {
            if let Some(server) = server {
                let _ = server.shutdown().await;
            }
            return Err(err);
        }
    };

    let outcome = capture(&session, timeout_secs, config).await;

    let quit = session.quit().await;
    if let Some(server) = server {
        server.shutdown().await?;
    }
    quit?;

    let (path, cookies) = outcome?;
    print_result(
        &ResultBuilder::new("auth.login")
            .data(AuthData { path, cookies })
            .build(),
        format,
    );
    Ok(())
}

async fn capture(
    session: &PortalSession,
    timeout_secs: u64,
    config: &Config,
) -> Result<(String, usize)> {
    let login_url = config.portal.login_url();
    session.goto(login_url).await?;

    println!("Browser opened at: {login_url}");
    println!();
    println!("Log in manually, then press Enter to save the session.");
    println!("(Or wait {timeout_secs} seconds for auto-save)");

    let stdin_future = tokio::task::spawn_blocking(|| {
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
    });
    let timeout_future = tokio::time::sleep(Duration::from_secs(timeout_secs));

    tokio::select! {
        _ = stdin_future => {
            println!("Saving session...");
        }
        _ = timeout_future => {
            println!("\nTimeout reached, saving session...");
        }
    }

    let path = config.auth.cookies_path();
    let count = session.save_cookies(&path).await?;
    info!(
        target = "jarvis",
        count,
        path = %path.display(),
        "login session captured"
    );
    Ok((path.display().to_string(), count))
}

/// Show the saved cookie file.
pub fn show(config: &Config, format: OutputFormat) -> Result<()> {
    let path = config.auth.cookies_path();
    if !path.exists() {
        return Err(JarvisError::Session(format!(
            "no saved session at {}, run `jarvis auth login` first",
            path.display()
        )));
    }
    let raw = std::fs::read_to_string(&path)?;
    let cookies: Vec<StoredCookie> = serde_json::from_str(&raw)?;
    print_result(
        &ResultBuilder::new("auth.show")
            .data(CookieListData {
                path: path.display().to_string(),
                cookies,
            })
            .build(),
        format,
    );
    Ok(())
}
