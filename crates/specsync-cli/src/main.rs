//! `specsync` command-line tool

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use specsync_core::{SyncConfig, SyncEngine};
use std::path::PathBuf;

mod commands;
mod telemetry;

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).required(true).value_parser(value_parser!(PathBuf)).help(help)
}

fn out_arg(help: &'static str) -> Arg {
    Arg::new("out").long("out").value_parser(value_parser!(PathBuf)).help(help)
}

fn cli() -> Command {
    Command::new("specsync")
        .version(specsync_core::VERSION)
        .about("Keep request collections and OpenAPI documents in sync")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Print the patches that bring a stored collection up to date")
                .arg(path_arg("original", "Original (stored) collection"))
                .arg(path_arg("new", "Newly generated collection"))
                .arg(
                    Arg::new("sequential-ids")
                        .long("sequential-ids")
                        .action(ArgAction::SetTrue)
                        .help("Use deterministic fresh ids instead of UUIDs"),
                ),
        )
        .subcommand(
            Command::new("diff")
                .about("Write the added/deleted paths and methods between two OpenAPI documents")
                .arg(path_arg("a", "Base document"))
                .arg(path_arg("b", "New document"))
                .arg(out_arg("Artifact file (defaults to the configured diff path)")),
        )
        .subcommand(
            Command::new("generate")
                .about("Build a candidate OpenAPI document from observed transactions")
                .arg(path_arg("transactions", "List of observed transactions"))
                .arg(out_arg("Output file; its extension picks JSON or YAML")),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge the paths and methods a candidate adds into a base document")
                .arg(path_arg("base", "Base document"))
                .arg(path_arg("candidate", "Candidate document"))
                .arg(out_arg("Output file; its extension picks JSON or YAML"))
                .arg(
                    Arg::new("non-breaking")
                        .long("non-breaking")
                        .action(ArgAction::SetTrue)
                        .help("Merge classified non-breaking additions; identical documents are not an error"),
                ),
        )
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .with_context(|| format!("missing argument <{name}>"))
}

fn run(matches: &ArgMatches) -> Result<String> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SyncConfig::from_file(path)?,
        None => SyncConfig::default(),
    };
    let engine = SyncEngine::new(config);

    match matches.subcommand() {
        Some(("reconcile", args)) => commands::reconcile(
            &engine,
            required_path(args, "original")?,
            required_path(args, "new")?,
            args.get_flag("sequential-ids"),
        ),
        Some(("diff", args)) => commands::diff(
            &engine,
            required_path(args, "a")?,
            required_path(args, "b")?,
            args.get_one::<PathBuf>("out").cloned(),
        ),
        Some(("generate", args)) => commands::generate(
            &engine,
            required_path(args, "transactions")?,
            args.get_one::<PathBuf>("out").map(PathBuf::as_path),
        ),
        Some(("merge", args)) => commands::merge(
            &engine,
            required_path(args, "base")?,
            required_path(args, "candidate")?,
            args.get_one::<PathBuf>("out").map(PathBuf::as_path),
            args.get_flag("non-breaking"),
        ),
        Some((other, _)) => anyhow::bail!("unknown command: {other}"),
        None => anyhow::bail!("no command given"),
    }
}

fn main() {
    let matches = cli().get_matches();
    telemetry::init(matches.get_flag("log-json"));

    match run(&matches) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
