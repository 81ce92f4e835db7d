//! # Compare Command Module / 比较命令模块
//!
//! This module implements the comparison run: expand the inputs into sources,
//! parse every source into one model, write the CSV (and optionally HTML)
//! report, then release every held resource.
//!
//! 此模块实现比较运行：将输入展开为输入源，把每个输入源解析进同一个模型，
//! 写出 CSV（以及可选的 HTML）报告，最后释放所有持有的资源。

use anyhow::Result;
use colored::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{
    core::{
        mapping::MappingTable,
        models::{Model, TestId, TestResult},
        parser::read_report,
        planner::{self, RejectReason, RejectedInput},
        source::Source,
    },
    infra::{resources::ResourceRegistry, t},
    reporting::{
        console::{print_progress_tick, print_summary},
        csv::generate_csv_report,
        html::generate_html_report,
    },
};

/// A comparison needs at least this many sources.
pub const MIN_SOURCES: usize = 2;

/// Everything the compare run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct CompareRequest {
    /// Files, directories and zip archives, in command-line order.
    pub inputs: Vec<String>,
    /// Destination of the CSV matrix.
    pub output: PathBuf,
    /// Optional mapping file of class-name rewrite rules.
    pub mapping: Option<PathBuf>,
    /// Optional destination of the HTML report.
    pub html: Option<PathBuf>,
    /// Unrecognized `-key=value` options, kept verbatim.
    pub options: BTreeMap<String, String>,
}

/// How a compare run ended, when it did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    /// The matrix was written.
    Compared {
        distinct_tests: usize,
        /// Sources whose parsing stopped early on an error.
        failed_sources: usize,
    },
    /// Fewer than [`MIN_SOURCES`] sources were resolved; nothing was written.
    InsufficientSources { found: usize },
}

/// Executes the compare command.
///
/// # Arguments
/// * `request` - The resolved command-line request
/// * `locale` - Locale for console messages
///
/// # Returns
/// The outcome of the run, or an error if the CSV output could not be written
pub fn execute(request: CompareRequest, locale: &str) -> Result<CompareOutcome> {
    let mut resources = ResourceRegistry::new();

    for (key, value) in &request.options {
        tracing::debug!(
            "{}",
            t!("option_ignored", locale = locale, key = key, value = value)
        );
    }

    let plan = planner::plan_analysis(&request.inputs, &mut resources);
    report_rejected(&plan.rejected, locale);

    if plan.sources.len() < MIN_SOURCES {
        return Ok(CompareOutcome::InsufficientSources {
            found: plan.sources.len(),
        });
    }

    let mapping = load_mapping(request.mapping.as_deref(), locale);
    let (model, failed_sources) = analyse(plan.sources, &mapping, locale);

    let written = write_output(&model, &request.output, locale);
    if written.is_ok() {
        if let Some(html_path) = &request.html {
            println!("{}", t!("html_generating", locale = locale, path = html_path.display()));
            if let Err(e) = generate_html_report(&model, html_path, locale) {
                eprintln!("{} {:#}", t!("html_failed", locale = locale).red(), e);
            }
        }
        print_summary(&model, locale);
    }

    let distinct_tests = model.len();
    // Sources hold shares of the handles; drop them so the registry holds the last one.
    drop(model);
    for failure in resources.release_all() {
        tracing::warn!("{}", t!("release_failed", locale = locale, error = failure));
    }

    written?;
    Ok(CompareOutcome::Compared {
        distinct_tests,
        failed_sources,
    })
}

fn report_rejected(rejected: &[RejectedInput], locale: &str) {
    for rejection in rejected {
        match &rejection.reason {
            RejectReason::Missing => {
                tracing::warn!("{}", t!("input_missing", locale = locale, path = &rejection.input));
            }
            RejectReason::UnknownType => {
                tracing::warn!(
                    "{}",
                    t!("input_unknown_type", locale = locale, path = &rejection.input)
                );
            }
            RejectReason::Unreadable(err) => {
                tracing::error!(
                    "{}",
                    t!("input_unreadable", locale = locale, path = &rejection.input, error = err)
                );
            }
        }
    }
}

/// Loads the mapping table. A file that cannot be loaded is reported and the
/// run continues without any mapping.
fn load_mapping(path: Option<&Path>, locale: &str) -> MappingTable {
    let Some(path) = path else {
        return MappingTable::new();
    };
    match MappingTable::load(path) {
        Ok(table) => {
            println!("{}", t!("mappings_loaded", locale = locale, count = table.len()));
            table
        }
        Err(err) => {
            tracing::error!(
                "{}",
                t!("mapping_load_failed", locale = locale, path = path.display(), error = err)
            );
            MappingTable::new()
        }
    }
}

/// Parses every source, in order, into a single model.
///
/// A source that fails keeps the results committed before the failure.
fn analyse(sources: Vec<Source>, mapping: &MappingTable, locale: &str) -> (Model, usize) {
    let mut model = Model::new(sources);
    let mut failed_sources = 0;

    println!("{}", t!("analysing", locale = locale, count = model.sources().len()));
    for index in 0..model.sources().len() {
        print_progress_tick();
        let source = &model.sources()[index];
        let mut committed: Vec<(TestId, TestResult)> = Vec::new();
        let outcome = read_report(source, mapping, &mut committed);
        if let Err(err) = outcome {
            failed_sources += 1;
            tracing::error!(
                "{}",
                t!("source_failed", locale = locale, name = source.name(), error = err)
            );
        }
        model.extend(committed);
    }
    println!("{}", t!("done", locale = locale));

    (model, failed_sources)
}

fn write_output(model: &Model, output: &Path, locale: &str) -> Result<()> {
    println!("{}", t!("writing_results", locale = locale, path = output.display()));
    println!("{}", t!("writing_rows", locale = locale, count = model.len()));
    generate_csv_report(model, output)?;
    println!("{}", t!("done", locale = locale));
    Ok(())
}
