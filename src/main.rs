//! `dotsync` binary entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use dotsync::cli::{Cli, Command};
use dotsync::commands;
use dotsync::exec::{Executor, SystemExecutor};
use dotsync::logging::{self, Logger};
use dotsync::prompt::TerminalPrompter;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose, args.command.log_name());
    let log = Arc::new(Logger::new(args.command.log_name()));

    let result = match args.command {
        Command::Setup => commands::setup::run(
            &args.global,
            log.as_ref(),
            &TerminalPrompter,
            &SystemExecutor,
        ),
        Command::Install(ref opts) => {
            let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
            commands::install::run(&args.global, opts, &log, executor)
        }
        Command::Version => commands::version::run(&mut std::io::stdout()),
        Command::Completions(ref opts) => {
            commands::version::completions(opts.shell, &mut std::io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
