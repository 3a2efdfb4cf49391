use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::{run_local, run_mock};
use crate::args::{Command, MockArgs, TesterArgs};
use crate::config::{DEFAULT_CONFIG_FILES, apply_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};

enum RunPlan {
    Mock(MockArgs),
    Local(TesterArgs),
}

/// Parses the command line, prepares logging and the runtime, and runs the
/// requested mode.
///
/// # Errors
///
/// Returns any configuration, runtime, or run error.
pub fn run() -> AppResult<()> {
    let Some((args, matches)) = parse_args()? else {
        return Ok(());
    };

    let plan = build_plan(args, &matches)?;

    let (verbose, no_color, dashboard) = match &plan {
        RunPlan::Mock(_) => (false, false, false),
        RunPlan::Local(args) => (
            args.verbose,
            args.no_color,
            crate::app::dashboard_enabled(args),
        ),
    };
    crate::logger::init_logging(verbose, no_color, dashboard);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(execute_plan(plan))
}

fn parse_args() -> AppResult<Option<(TesterArgs, ArgMatches)>> {
    let mut cmd = TesterArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn build_plan(mut args: TesterArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(Command::Mock(mock_args)) = args.command.take() {
        return Ok(RunPlan::Mock(mock_args));
    }

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    if args.url.is_none() {
        return Err(AppError::validation(ValidationError::MissingUrl));
    }

    Ok(RunPlan::Local(args))
}

async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Mock(args) => run_mock(args).await,
        RunPlan::Local(args) => run_local(args).await,
    }
}
