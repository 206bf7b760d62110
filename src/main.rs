//! easycmd binary entry point.

use std::process::ExitCode;

use easycmd::cli;
use easycmd::config::Config;
use easycmd::execution::execute;
use easycmd::{logging, EasyCmdError};
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Try 'easycmd --help' for more information.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }
    if args.command.is_empty() {
        eprintln!("error: no command given");
        eprintln!("Try 'easycmd --help' for more information.");
        return ExitCode::from(2);
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    // Logging
    let _ = logging::try_init_with(Some(config.log_filter()));
    debug!(?config, "configuration loaded");

    let command = config.command(args.command_line());
    let cmd = config.to_builder().build();

    match execute(&command, cmd.config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("easycmd: {}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Process exit status reported for a failed execution.
fn exit_status(err: &EasyCmdError) -> u8 {
    match err {
        EasyCmdError::EmptyCommand => 2,
        EasyCmdError::StartFailure(_) => 127,
        EasyCmdError::TimeoutFailure { .. } => 124,
        EasyCmdError::RuntimeFailure(_) => err
            .exit_code()
            .and_then(|code| u8::try_from(code).ok())
            .filter(|code| *code != 0)
            .unwrap_or(1),
    }
}
