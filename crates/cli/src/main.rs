use clap::Parser;
use jarvis_cli::{
    cli::Cli,
    commands,
    error::JarvisError,
    logging,
    output::{self, OutputFormat, ResultBuilder},
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let format = cli.format;

    if let Err(err) = commands::dispatch(cli, format).await {
        handle_error(err, format);
        std::process::exit(1);
    }
}

fn handle_error(err: JarvisError, format: OutputFormat) {
    let cmd_error = err.to_command_error();

    // Always print to stderr for humans
    output::print_error_stderr(&cmd_error);

    // Also emit the envelope to stdout with ok=false (for agents)
    if format != OutputFormat::Text {
        let result: output::CommandResult<()> = ResultBuilder::new("unknown")
            .error(cmd_error.code, &cmd_error.message)
            .build();
        output::print_result(&result, format);
    }
}
