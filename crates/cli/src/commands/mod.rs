//! Command implementations.

mod auth;
mod launch;
mod review;

use crate::cli::{AuthAction, Cli, Commands};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputFormat;

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Review(args) => review::execute(args, &config, format).await,
        Commands::Auth { action } => match action {
            AuthAction::Login { timeout } => auth::login(timeout, &config, format).await,
            AuthAction::Show => auth::show(&config, format),
        },
        Commands::Hello(args) => launch::hello(args, &config, format).await,
        Commands::Bye => launch::bye(&config, format).await,
        Commands::Happy => launch::happy(cli.config.as_deref(), format),
        Commands::Clone(args) => launch::clone_repo(args, format).await,
    }
}
