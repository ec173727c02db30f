use std::process::ExitCode;

use clap::{arg, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

mod run;

use run::{run_check, run_match};

pub fn cli() -> Command {
    Command::new("extractor")
        .about("Match values against structural patterns and extract their parts")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .subcommand(
            Command::new("match")
                .arg(arg!(<PATTERN> "Pattern, e.g. \"[head, *tail]\""))
                .arg(arg!(<CANDIDATE> "Value to match, e.g. \"[1, 2, 3]\""))
                .arg(arg!(-d --debug "Print debug information"))
                .arg_required_else_help(true)
                .about("Match a value against a pattern and print the bindings"),
        )
        .subcommand(
            Command::new("check")
                .arg(arg!(<PATTERN> "Pattern to compile"))
                .arg(arg!(-d --debug "Print debug information"))
                .arg_required_else_help(true)
                .about("Compile a pattern and print its matcher tree"),
        )
}

/// Logs go to stderr. `RUST_LOG` picks the filter, `--debug` forces `debug`.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("extractor=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

pub fn parse_cli() -> ExitCode {
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("match", args)) => {
            init_tracing(args.get_flag("debug"));
            run_match(required(args, "PATTERN"), required(args, "CANDIDATE"))
        }
        Some(("check", args)) => {
            init_tracing(args.get_flag("debug"));
            run_check(required(args, "PATTERN"))
        }
        _ => return ExitCode::FAILURE,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("{error:?}");
            ExitCode::FAILURE
        }
    }
}
