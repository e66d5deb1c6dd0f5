// SPDX-License-Identifier: PMPL-1.0-or-later

//! transcat: Qt Linguist catalog QA and lookup tool
//!
//! Companion CLI for the transcat library: validates `.ts` catalogs
//! (placeholder cardinality, numerus form counts), reports translation
//! coverage, and performs one-shot string resolution for debugging.

use anyhow::{anyhow, Context as _, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use transcat::report::{self, CoverageReport, ValidationReport};
use transcat::resolver::{self, Resolver, StderrObserver};
use transcat::ts;

#[derive(Parser)]
#[command(name = "transcat")]
#[command(version)]
#[command(about = "Qt Linguist translation catalog QA and lookup")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one catalog or every *.ts file under a directory
    Validate {
        /// Catalog file or directory to scan
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },

    /// Report translation coverage per context
    Coverage {
        /// Catalog file or directory to scan
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a single string against a catalog
    Resolve {
        /// Catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Context name (e.g. "DownloadManager")
        #[arg(short, long)]
        context: String,

        /// Source text to look up
        #[arg(short, long)]
        source: String,

        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,

        /// Plural count (substitutes %n)
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Positional argument for %1, %2, … (repeatable)
        #[arg(short, long = "arg")]
        args: Vec<String>,
    },
}

#[derive(Serialize)]
struct FileReport<T: Serialize> {
    file: PathBuf,
    #[serde(flatten)]
    report: T,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Validate {
            target,
            output,
            strict,
        } => run_validate(&target, output.as_deref(), strict),
        Commands::Coverage { target, output } => run_coverage(&target, output.as_deref()),
        Commands::Resolve {
            file,
            context,
            source,
            comment,
            count,
            args,
        } => run_resolve(&file, &context, &source, comment.as_deref(), count, &args),
    }
}

fn run_validate(target: &Path, output: Option<&Path>, strict: bool) -> Result<()> {
    let files = collect_catalogs(target)?;
    let results: Vec<(PathBuf, Result<ValidationReport>)> = files
        .par_iter()
        .map(|path| {
            let report = ts::load_file(path)
                .map(|catalog| report::validate(&catalog))
                .map_err(|e| anyhow!(e));
            (path.clone(), report)
        })
        .collect();

    let mut reports = Vec::new();
    let mut malformed = 0usize;
    let mut warnings = 0usize;
    for (path, result) in results {
        match result {
            Ok(report) => {
                report::print_validation(&path.display().to_string(), &report);
                warnings += report.warnings();
                reports.push(FileReport { file: path, report });
            }
            Err(err) => {
                println!("\n{} {}", "MALFORMED".bold().red(), path.display());
                println!("  {}", err);
                malformed += 1;
            }
        }
    }

    if let Some(output) = output {
        write_json(output, &reports)?;
        println!("\nReport written to {}", output.display());
    }

    if malformed > 0 {
        return Err(anyhow!("{} malformed catalog(s)", malformed));
    }
    if strict && warnings > 0 {
        return Err(anyhow!("{} warning(s) in strict mode", warnings));
    }
    Ok(())
}

fn run_coverage(target: &Path, output: Option<&Path>) -> Result<()> {
    let files = collect_catalogs(target)?;
    let results: Vec<(PathBuf, Result<CoverageReport>)> = files
        .par_iter()
        .map(|path| {
            let report = ts::load_file(path)
                .map(|catalog| report::coverage(&catalog))
                .map_err(|e| anyhow!(e));
            (path.clone(), report)
        })
        .collect();

    let mut reports = Vec::new();
    let mut malformed = 0usize;
    for (path, result) in results {
        match result {
            Ok(report) => {
                report::print_coverage(&path.display().to_string(), &report);
                reports.push(FileReport { file: path, report });
            }
            Err(err) => {
                println!("\n{} {}", "MALFORMED".bold().red(), path.display());
                println!("  {}", err);
                malformed += 1;
            }
        }
    }

    if let Some(output) = output {
        write_json(output, &reports)?;
        println!("\nReport written to {}", output.display());
    }

    if malformed > 0 {
        return Err(anyhow!("{} malformed catalog(s)", malformed));
    }
    Ok(())
}

fn run_resolve(
    file: &Path,
    context: &str,
    source: &str,
    comment: Option<&str>,
    count: Option<u64>,
    args: &[String],
) -> Result<()> {
    let catalog =
        ts::load_file(file).with_context(|| format!("loading catalog {}", file.display()))?;
    let resolver = Resolver::with_observer(catalog, Arc::new(StderrObserver));
    let resolved = resolver.resolve(context, source, comment, count);
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    println!("{}", resolver::substitute(&resolved, &arg_refs));
    Ok(())
}

fn collect_catalogs(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
        return Err(anyhow!("{} is neither a file nor a directory", target.display()));
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(target)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("ts"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(anyhow!("no .ts catalogs found under {}", target.display()));
    }
    Ok(files)
}

fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report parent {}", parent.display()))?;
        }
    }
    let rendered = serde_json::to_string_pretty(payload).context("serializing report as json")?;
    fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
