//! Launcher commands: lifecycle hooks, the detached grading run, and
//! repository cloning. Each reports the control panel's one-line status.

use std::path::Path;

use crate::cli::{CloneArgs, HelloArgs};
use crate::config::Config;
use crate::error::Result;
use crate::launcher::{Launcher, ShellRunner};
use crate::output::{OutputFormat, ResultBuilder, StatusData, print_result};

fn print_status(command: &str, launcher: &Launcher<ShellRunner>, format: OutputFormat) {
    print_result(
        &ResultBuilder::new(command)
            .data(StatusData {
                status: launcher.status().to_string(),
            })
            .build(),
        format,
    );
}

pub async fn hello(args: HelloArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let email = args
        .email
        .or_else(|| config.github.email.clone())
        .unwrap_or_default();
    let username = args
        .username
        .or_else(|| config.github.username.clone())
        .unwrap_or_default();

    let mut launcher = Launcher::new(ShellRunner);
    launcher
        .hello(&config.launcher.lifecycle_script, &email, &username)
        .await?;
    print_status("hello", &launcher, format);
    Ok(())
}

pub async fn bye(config: &Config, format: OutputFormat) -> Result<()> {
    let mut launcher = Launcher::new(ShellRunner);
    launcher.bye(&config.launcher.lifecycle_script).await?;
    print_status("bye", &launcher, format);
    Ok(())
}

/// Start a detached review run of this same binary and return at once.
pub fn happy(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let exe = std::env::current_exe()?;
    let exe = exe.display().to_string();

    let mut owned: Vec<String> = vec!["review".to_string()];
    if let Some(path) = config_path {
        owned.push("--config".to_string());
        owned.push(path.display().to_string());
    }
    let args: Vec<&str> = owned.iter().map(String::as_str).collect();

    let mut launcher = Launcher::new(ShellRunner);
    launcher.happy(&exe, &args)?;
    print_status("happy", &launcher, format);
    Ok(())
}

pub async fn clone_repo(args: CloneArgs, format: OutputFormat) -> Result<()> {
    let mut launcher = Launcher::new(ShellRunner);
    launcher.clone_repo(&args.repo).await?;
    print_status("clone", &launcher, format);
    Ok(())
}
