use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use jarvis::{Reaction, ReactionPolicy, RecoveryPolicy};

use crate::output::OutputFormat;

/// clap Styles configured to match cargo's help output colors.
fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Cyan.on_default())
        .valid(AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(name = "jarvis")]
#[command(about = "JARVIS - control panel and grading runner for the campus portal")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format: json (default) or text
    #[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Config file (defaults to ./jarvis.toml when present)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drain pending grading items on the portal
    Review(ReviewArgs),

    /// Authentication and session management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Run the hello lifecycle hook with GitHub identity
    Hello(HelloArgs),

    /// Run the bye lifecycle hook
    Bye,

    /// Start a detached grading run and return immediately
    Happy,

    /// Clone a git repository
    Clone(CloneArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReviewArgs {
    /// Listing to drain
    #[arg(long, value_enum, default_value = "grades")]
    pub page: ListingPage,

    /// Reaction applied to each item (overrides config)
    #[arg(long, value_enum)]
    pub reaction: Option<ReactionArg>,

    /// Recovery when the proceed control goes missing (overrides config)
    #[arg(long, value_enum)]
    pub recovery: Option<RecoveryArg>,

    /// Seed for the random reaction strategy (reproducible runs)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run the browser without a visible window
    #[arg(long)]
    pub headless: bool,

    /// Leave the browser and driver running after the run
    #[arg(long)]
    pub keep_open: bool,
}

/// Which pending listing a review run drains
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ListingPage {
    /// The grades listing
    #[default]
    Grades,
    /// The skills listing (opens the newest course first)
    Skills,
}

impl std::fmt::Display for ListingPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingPage::Grades => write!(f, "grades"),
            ListingPage::Skills => write!(f, "skills"),
        }
    }
}

/// Reaction spelling shared by CLI flags and the config file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionArg {
    #[default]
    Happy,
    Midhappy,
    Serious,
    Sad,
    /// Uniform random pick per item
    Random,
}

impl From<ReactionArg> for ReactionPolicy {
    fn from(arg: ReactionArg) -> Self {
        match arg {
            ReactionArg::Happy => ReactionPolicy::Fixed(Reaction::Happy),
            ReactionArg::Midhappy => ReactionPolicy::Fixed(Reaction::MidHappy),
            ReactionArg::Serious => ReactionPolicy::Fixed(Reaction::Serious),
            ReactionArg::Sad => ReactionPolicy::Fixed(Reaction::Sad),
            ReactionArg::Random => ReactionPolicy::Uniform,
        }
    }
}

/// Recovery spelling shared by CLI flags and the config file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryArg {
    /// Stop the run and report how far it got
    Abort,
    /// Re-navigate to the listing and continue
    #[default]
    Relist,
}

impl From<RecoveryArg> for RecoveryPolicy {
    fn from(arg: RecoveryArg) -> Self {
        match arg {
            RecoveryArg::Abort => RecoveryPolicy::Abort,
            RecoveryArg::Relist => RecoveryPolicy::Relist,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct HelloArgs {
    /// GitHub email exported to the hook (overrides config)
    #[arg(long)]
    pub email: Option<String>,

    /// GitHub username exported to the hook (overrides config)
    #[arg(long)]
    pub username: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CloneArgs {
    /// Repository URL; an empty value is a no-op
    #[arg(default_value = "")]
    pub repo: String,
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Interactive login - opens a browser for manual login, then saves cookies
    Login {
        /// Wait time in seconds for manual login
        #[arg(short, long, default_value = "120")]
        timeout: u64,
    },

    /// Show the saved cookie file
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_review_defaults() {
        let cli = Cli::try_parse_from(vec!["jarvis", "review"]).unwrap();

        match cli.command {
            Commands::Review(args) => {
                assert_eq!(args.page, ListingPage::Grades);
                assert_eq!(args.reaction, None);
                assert_eq!(args.recovery, None);
                assert!(!args.headless);
                assert!(!args.keep_open);
            }
            _ => panic!("Expected Review command"),
        }
    }

    #[test]
    fn parse_review_with_strategy_flags() {
        let args = vec![
            "jarvis",
            "review",
            "--page",
            "skills",
            "--reaction",
            "random",
            "--recovery",
            "abort",
            "--seed",
            "42",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Review(args) => {
                assert_eq!(args.page, ListingPage::Skills);
                assert_eq!(args.reaction, Some(ReactionArg::Random));
                assert_eq!(args.recovery, Some(RecoveryArg::Abort));
                assert_eq!(args.seed, Some(42));
            }
            _ => panic!("Expected Review command"),
        }
    }

    #[test]
    fn parse_hello_with_identity() {
        let args = vec![
            "jarvis",
            "hello",
            "--email",
            "dev@example.com",
            "--username",
            "dev",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Hello(args) => {
                assert_eq!(args.email.as_deref(), Some("dev@example.com"));
                assert_eq!(args.username.as_deref(), Some("dev"));
            }
            _ => panic!("Expected Hello command"),
        }
    }

    #[test]
    fn parse_clone_defaults_to_empty_repo() {
        let cli = Cli::try_parse_from(vec!["jarvis", "clone"]).unwrap();

        match cli.command {
            Commands::Clone(args) => assert_eq!(args.repo, ""),
            _ => panic!("Expected Clone command"),
        }
    }

    #[test]
    fn verbose_flag_short_and_long() {
        let short_cli = Cli::try_parse_from(vec!["jarvis", "-v", "bye"]).unwrap();
        assert_eq!(short_cli.verbose, 1);

        let long_cli = Cli::try_parse_from(vec!["jarvis", "--verbose", "bye"]).unwrap();
        assert_eq!(long_cli.verbose, 1);

        let double_cli = Cli::try_parse_from(vec!["jarvis", "-vv", "bye"]).unwrap();
        assert_eq!(double_cli.verbose, 2);
    }

    #[test]
    fn reaction_policy_conversion_covers_random() {
        assert_eq!(
            ReactionPolicy::from(ReactionArg::Random),
            ReactionPolicy::Uniform
        );
        assert_eq!(
            ReactionPolicy::from(ReactionArg::Midhappy),
            ReactionPolicy::Fixed(Reaction::MidHappy)
        );
    }

    #[test]
    fn invalid_reaction_fails() {
        let args = vec!["jarvis", "review", "--reaction", "thrilled"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let args = vec!["jarvis", "review", "--config", "/tmp/jarvis.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/jarvis.toml")));
    }
}
