//! Batch driver: every `*.json` export in the input directory becomes a report.
//!
//! Files are processed one at a time in file-name order. A file that cannot be
//! read, parsed, validated or emitted is reported and skipped; only failures to
//! list the input directory, create the output directory or write the final
//! workbook abort the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use gtm_export_core::parse_file;
use gtm_report::classify::AdNetworkKey;
use gtm_report::emit::{Emitter, HtmlEmitter, WorkbookEmitter};
use gtm_report::lookup::{default_lookup_tables, load_lookup_tables, LookupTables};
use gtm_report::transform::{transform, TransformOptions};

use crate::cli::{AdNetworkKeyArg, Cli, ReportFormat};

#[derive(Debug, Default)]
struct RunSummary {
    files: usize,
    reports: usize,
    skipped: usize,
}

pub fn run_report(args: Cli) -> Result<()> {
    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create output directory {}", args.output.display()))?;
    let files = list_json_files(&args.input)
        .with_context(|| format!("failed to read input directory {}", args.input.display()))?;

    let tables = resolve_tables(args.mappings_file.as_deref());
    let options = TransformOptions {
        ad_network_key: ad_network_key(args.ad_network_key),
    };
    let mut emitters = build_emitters(args.format, &args.output);
    let mut summary = RunSummary::default();

    for path in &files {
        summary.files += 1;
        if process_file(path, &tables, options, &mut emitters, args.quiet) {
            summary.reports += 1;
        } else {
            summary.skipped += 1;
        }
    }

    for emitter in &mut emitters {
        let written = emitter
            .finish()
            .with_context(|| format!("failed to finish {} report", emitter.name()))?;
        if let Some(path) = written {
            progress(args.quiet, &format!("wrote {}", path.display()));
        }
    }

    println!(
        "report_summary files={} reports={} skipped={}",
        summary.files, summary.reports, summary.skipped
    );
    Ok(())
}

/// Returns true when every emitter accepted the container.
fn process_file(
    path: &Path,
    tables: &LookupTables,
    options: TransformOptions,
    emitters: &mut [Box<dyn Emitter>],
    quiet: bool,
) -> bool {
    let document = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    progress(quiet, &format!("processing {document}"));

    let export = match parse_file(path) {
        Ok(export) => export,
        Err(err) => {
            report_error(&format!("{document}: {err}"));
            return false;
        }
    };
    let report = match transform(&export, &document, tables, options) {
        Ok(report) => report,
        Err(err) => {
            report_error(&err.to_string());
            return false;
        }
    };

    let mut ok = true;
    for emitter in emitters.iter_mut() {
        match emitter.emit(&report) {
            Ok(Some(written)) => progress(quiet, &format!("wrote {}", written.display())),
            Ok(None) => {}
            Err(err) => {
                report_error(&format!("{document}: {} report: {err}", emitter.name()));
                ok = false;
            }
        }
    }
    ok
}

/// Non-recursive listing of `*.json` files, sorted by file name.
fn list_json_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn build_emitters(format: ReportFormat, output: &Path) -> Vec<Box<dyn Emitter>> {
    let mut emitters: Vec<Box<dyn Emitter>> = Vec::new();
    if matches!(format, ReportFormat::Html | ReportFormat::Both) {
        emitters.push(Box::new(HtmlEmitter::new(output)));
    }
    if matches!(format, ReportFormat::Xlsx | ReportFormat::Both) {
        emitters.push(Box::new(WorkbookEmitter::new(output)));
    }
    emitters
}

fn resolve_tables(path: Option<&Path>) -> LookupTables {
    let Some(path) = path else {
        return default_lookup_tables();
    };

    match load_lookup_tables(path) {
        Ok(tables) => tables,
        Err(err) => {
            eprintln!(
                "{} failed to load lookup tables from {} ({err}); using embedded defaults",
                "warning:".yellow(),
                path.display()
            );
            default_lookup_tables()
        }
    }
}

fn ad_network_key(arg: AdNetworkKeyArg) -> AdNetworkKey {
    match arg {
        AdNetworkKeyArg::Name => AdNetworkKey::Name,
        AdNetworkKeyArg::Type => AdNetworkKey::Type,
        AdNetworkKeyArg::Auto => AdNetworkKey::Auto,
    }
}

fn progress(quiet: bool, line: &str) {
    if !quiet {
        eprintln!("{line}");
    }
}

fn report_error(line: &str) {
    eprintln!("{} {line}", "error:".red());
}
