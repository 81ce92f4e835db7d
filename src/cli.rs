// src/cli.rs
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use colored::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::cli::commands::compare::{self, CompareOutcome, CompareRequest};
use crate::infra::{fs, logging, t};

pub mod commands;

/// Exit code for a usage error or a fatal failure writing the output.
pub const EXIT_ERROR: i32 = -1;

/// Output file used when no `-output=` option is given.
pub const DEFAULT_OUTPUT: &str = "comparison.csv";

/// Options that may be spelled `-key=value` and are forwarded to clap.
const KNOWN_OPTIONS: &[&str] = &["output", "mapping", "html", "lang"];

/// Command-line arguments after legacy option normalization.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizedArgs {
    /// Arguments for clap, program name first.
    pub args: Vec<String>,
    /// Unrecognized `-key=value` options, stored verbatim.
    pub extra_options: BTreeMap<String, String>,
}

/// Rewrites single-dash `-key=value` options.
///
/// Known keys become `--key=value`; any other key is taken out of the argument
/// list and kept in [`NormalizedArgs::extra_options`]. Everything after a bare
/// `--` is passed through untouched.
pub fn normalize_legacy_args<I: IntoIterator<Item = String>>(args: I) -> NormalizedArgs {
    let mut normalized = NormalizedArgs::default();
    let mut passthrough = false;

    for (position, arg) in args.into_iter().enumerate() {
        if position == 0 || passthrough {
            normalized.args.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            normalized.args.push(arg);
            continue;
        }
        let legacy = arg
            .strip_prefix('-')
            .filter(|rest| !rest.starts_with('-'))
            .and_then(|rest| rest.split_once('='));
        match legacy {
            Some((key, value)) if !key.is_empty() => {
                if KNOWN_OPTIONS.contains(&key) {
                    normalized.args.push(format!("--{}={}", key, value));
                } else {
                    normalized
                        .extra_options
                        .insert(key.to_string(), value.to_string());
                }
            }
            _ => normalized.args.push(arg),
        }
    }
    normalized
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for `--lang <VALUE>`, `--lang=<VALUE>` and `-lang=<VALUE>`.
fn pre_parse_language(args: &[String]) -> String {
    for (pos, arg) in args.iter().enumerate() {
        if arg == "--lang" {
            if let Some(lang) = args.get(pos + 1) {
                return lang.clone();
            }
        }
        if let Some(lang) = arg
            .strip_prefix("--lang=")
            .or_else(|| arg.strip_prefix("-lang="))
        {
            return lang.to_string();
        }
    }
    // Fallback to system language detection
    sys_locale::get_locale().unwrap_or_else(|| "en".to_string())
}

fn build_cli(locale: &str) -> Command {
    Command::new("junit-diff")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("inputs")
                .help(t!("arg_inputs", locale = locale).to_string())
                .value_name("INPUTS")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .help(t!("arg_output", locale = locale).to_string())
                .value_name("OUTPUT")
                .default_value(DEFAULT_OUTPUT)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("mapping")
                .long("mapping")
                .help(t!("arg_mapping", locale = locale).to_string())
                .value_name("MAPPING")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help(t!("arg_html", locale = locale).to_string())
                .value_name("HTML")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("arg_verbose", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
}

/// Tell the user how to use this program if the args are bad.
fn print_usage(locale: &str) {
    println!("{}", t!("usage_sources", locale = locale));
    println!("{}", t!("usage_output", locale = locale, default = DEFAULT_OUTPUT));
    println!("{}", t!("usage_mapping", locale = locale));
}

/// Runs the tool and returns the process exit code.
///
/// On success the exit code is the number of distinct tests found. Usage
/// errors and a failure to write the CSV return [`EXIT_ERROR`].
pub fn run<I: IntoIterator<Item = String>>(args: I) -> i32 {
    let args: Vec<String> = args.into_iter().collect();

    // Pre-parse language and initialize i18n first.
    let language = crate::resolve_locale(&pre_parse_language(&args));
    rust_i18n::set_locale(&language);

    let normalized = normalize_legacy_args(args);
    let matches = match build_cli(&language).try_get_matches_from(&normalized.args) {
        Ok(matches) => matches,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => {
                    print_usage(&language);
                    EXIT_ERROR
                }
            };
        }
    };

    logging::init(matches.get_flag("verbose"));

    let request = CompareRequest {
        inputs: matches
            .get_many::<String>("inputs")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        output: matches
            .get_one::<String>("output")
            .map(|p| fs::expand_path(p))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        mapping: matches.get_one::<String>("mapping").map(|p| fs::expand_path(p)),
        html: matches.get_one::<String>("html").map(|p| fs::expand_path(p)),
        options: normalized.extra_options,
    };

    match compare::execute(request, &language) {
        Ok(CompareOutcome::Compared {
            distinct_tests,
            failed_sources,
        }) => {
            tracing::debug!(
                "{} distinct tests, {} source(s) stopped early",
                distinct_tests,
                failed_sources
            );
            i32::try_from(distinct_tests).unwrap_or(i32::MAX)
        }
        Ok(CompareOutcome::InsufficientSources { found }) => {
            tracing::debug!("only {} source(s) resolved", found);
            print_usage(&language);
            EXIT_ERROR
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            EXIT_ERROR
        }
    }
}
