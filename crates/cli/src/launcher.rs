//! Launcher actions behind the JARVIS control panel.
//!
//! Each action invokes an external program and replaces the one-line
//! status on success. Child exit codes are not inspected; only a failed
//! spawn surfaces an error and leaves the status untouched.

use std::process::Stdio;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{JarvisError, Result};

/// Environment overlay keys for the hello hook.
pub const GITHUB_EMAIL_VAR: &str = "GITHUB_EMAIL";
pub const GITHUB_USERNAME_VAR: &str = "GITHUB_USERNAME";

/// Seam between launcher actions and the operating system.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run a program to completion with an environment overlay applied
    /// to the child process only.
    async fn run(&self, program: &str, args: &[&str], envs: &[(&str, String)]) -> Result<()>;

    /// Start a program detached: no lifetime tracking, no exit code,
    /// no output.
    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// Runner backed by real child processes.
pub struct ShellRunner;

#[async_trait]
impl ScriptRunner for ShellRunner {
    async fn run(&self, program: &str, args: &[&str], envs: &[(&str, String)]) -> Result<()> {
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args);
        for (key, value) in envs {
            cmd.env(key, value);
        }
        let status = cmd.status().await.map_err(|source| JarvisError::Script {
            program: program.to_string(),
            source,
        })?;
        // Exit codes land in the log only.
        debug!(target = "jarvis", program, ?status, "child finished");
        Ok(())
    }

    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<()> {
        let mut cmd = std::process::Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // On Unix, a new process group so the child survives CLI exit
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

        cmd.spawn().map_err(|source| JarvisError::Script {
            program: program.to_string(),
            source,
        })?;
        Ok(())
    }
}

/// The control panel's state: one status line, replaced by each
/// successful action.
pub struct Launcher<R: ScriptRunner> {
    runner: R,
    status: String,
}

impl<R: ScriptRunner> Launcher<R> {
    pub fn new(runner: R) -> Self {
        Launcher {
            runner,
            status: "Ready".to_string(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Run the lifecycle script's hello hook with GitHub identity
    /// overlaid on the child environment.
    pub async fn hello(&mut self, script: &str, email: &str, username: &str) -> Result<()> {
        let envs = [
            (GITHUB_EMAIL_VAR, email.to_string()),
            (GITHUB_USERNAME_VAR, username.to_string()),
        ];
        self.runner.run(script, &["hello"], &envs).await?;
        self.status = "Hello command executed".to_string();
        Ok(())
    }

    pub async fn bye(&mut self, script: &str) -> Result<()> {
        self.runner.run(script, &["bye"], &[]).await?;
        self.status = "Goodbye!".to_string();
        Ok(())
    }

    /// Fire-and-forget grading run.
    pub fn happy(&mut self, program: &str, args: &[&str]) -> Result<()> {
        self.runner.spawn_detached(program, args)?;
        info!(target = "jarvis", program, "detached grading run started");
        self.status = "Happy mode activated".to_string();
        Ok(())
    }

    /// Clone a repository. An empty URL performs no invocation and
    /// leaves the status untouched.
    pub async fn clone_repo(&mut self, repo: &str) -> Result<()> {
        let repo = repo.trim();
        if repo.is_empty() {
            debug!(target = "jarvis", "empty repository url, nothing to clone");
            return Ok(());
        }
        self.runner.run("git", &["clone", repo], &[]).await?;
        self.status = format!("Cloned repository: {repo}");
        Ok(())
    }
}
