// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog QA reports: validation findings and translation coverage
//!
//! Findings are advisory. Anything fatal is rejected by the loader before
//! a `Catalog` exists; what remains here are the mistakes translators
//! actually ship — dropped placeholders, short numerus lists, finished
//! entries with empty text.

use crate::placeholder::PlaceholderScanner;
use crate::types::{Catalog, Completeness, LoadStats, Message, Translation, TranslationState};
use chrono::Utc;
use colored::Colorize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// Positional markers in source and translation differ in cardinality.
    PlaceholderMismatch,
    /// Plural message supplies fewer forms than its locale requires.
    ShortNumerus,
    /// Entry marked finished but carrying empty text.
    EmptyFinished,
    /// Source has `%n` but a finished form drops it. Often deliberate
    /// ("one minute remaining"), hence informational.
    CountMarkerDropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: FindingSeverity,
    pub context: String,
    pub source: String,
    pub detail: String,
}

/// Validation output for one catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub created_at: String,
    pub locale: String,
    pub stats: LoadStats,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn warnings(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == FindingSeverity::Warning)
            .count()
    }
}

/// Check every message of a loaded catalog for advisory problems.
pub fn validate(catalog: &Catalog) -> ValidationReport {
    let scanner = PlaceholderScanner::new();
    let required_forms = catalog.plural_rule().required_forms();
    let mut findings = Vec::new();

    for context in catalog.contexts() {
        for message in context.messages() {
            check_message(&scanner, context.name(), message, required_forms, &mut findings);
        }
    }

    ValidationReport {
        created_at: Utc::now().to_rfc3339(),
        locale: catalog.locale().to_string(),
        stats: catalog.stats(),
        findings,
    }
}

fn check_message(
    scanner: &PlaceholderScanner,
    context: &str,
    message: &Message,
    required_forms: usize,
    findings: &mut Vec<Finding>,
) {
    let source_markers = scanner.scan(&message.source);
    let push = |findings: &mut Vec<Finding>, kind, severity, detail: String| {
        findings.push(Finding {
            kind,
            severity,
            context: context.to_string(),
            source: message.source.clone(),
            detail,
        });
    };

    match &message.translation {
        Translation::Single(state) => {
            if let TranslationState::Finished(text) = state {
                if text.is_empty() {
                    push(
                        findings,
                        FindingKind::EmptyFinished,
                        FindingSeverity::Warning,
                        "finished entry has empty text".to_string(),
                    );
                    return;
                }
                let translated = scanner.scan(text);
                if !source_markers.same_cardinality(&translated) {
                    let missing = source_markers.missing_from(&translated);
                    push(
                        findings,
                        FindingKind::PlaceholderMismatch,
                        FindingSeverity::Warning,
                        if missing.is_empty() {
                            "translation introduces markers absent from source".to_string()
                        } else {
                            format!(
                                "translation drops positional marker(s) {}",
                                missing
                                    .iter()
                                    .map(|i| format!("%{}", i))
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            )
                        },
                    );
                }
            }
        }
        Translation::Plural(forms) => {
            if forms.len() < required_forms {
                push(
                    findings,
                    FindingKind::ShortNumerus,
                    FindingSeverity::Warning,
                    format!(
                        "{} numerus form(s) supplied, locale requires {}",
                        forms.len(),
                        required_forms
                    ),
                );
            }
            for (slot, form) in forms.iter().enumerate() {
                if let TranslationState::Finished(text) = form {
                    if text.is_empty() {
                        push(
                            findings,
                            FindingKind::EmptyFinished,
                            FindingSeverity::Warning,
                            format!("numerus form {} is finished but empty", slot),
                        );
                        continue;
                    }
                    let translated = scanner.scan(text);
                    if source_markers.count_markers > 0 && translated.count_markers == 0 {
                        push(
                            findings,
                            FindingKind::CountMarkerDropped,
                            FindingSeverity::Info,
                            format!("numerus form {} drops %n", slot),
                        );
                    }
                    if source_markers.positional != translated.positional {
                        push(
                            findings,
                            FindingKind::PlaceholderMismatch,
                            FindingSeverity::Warning,
                            format!("numerus form {} changes positional markers", slot),
                        );
                    }
                }
            }
        }
    }
}

/// Per-context completeness counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextCoverage {
    pub name: String,
    pub finished: usize,
    pub drafts: usize,
    pub untranslated: usize,
}

impl ContextCoverage {
    pub fn total(&self) -> usize {
        self.finished + self.drafts + self.untranslated
    }
}

/// Coverage rollup for one catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub created_at: String,
    pub locale: String,
    pub total_messages: usize,
    pub finished: usize,
    pub drafts: usize,
    pub untranslated: usize,
    pub coverage_percent: f64,
    pub contexts: Vec<ContextCoverage>,
}

/// Count finished/draft/untranslated messages per context.
pub fn coverage(catalog: &Catalog) -> CoverageReport {
    let mut contexts = Vec::with_capacity(catalog.contexts().len());
    let (mut finished, mut drafts, mut untranslated) = (0usize, 0usize, 0usize);

    for context in catalog.contexts() {
        let mut entry = ContextCoverage {
            name: context.name().to_string(),
            finished: 0,
            drafts: 0,
            untranslated: 0,
        };
        for message in context.messages() {
            match message.completeness() {
                Completeness::Finished => entry.finished += 1,
                Completeness::Draft => entry.drafts += 1,
                Completeness::Untranslated => entry.untranslated += 1,
            }
        }
        finished += entry.finished;
        drafts += entry.drafts;
        untranslated += entry.untranslated;
        contexts.push(entry);
    }

    let total = finished + drafts + untranslated;
    let coverage_percent = if total == 0 {
        100.0
    } else {
        (finished as f64 / total as f64) * 100.0
    };

    CoverageReport {
        created_at: Utc::now().to_rfc3339(),
        locale: catalog.locale().to_string(),
        total_messages: total,
        finished,
        drafts,
        untranslated,
        coverage_percent,
        contexts,
    }
}

// ─── Terminal output ────────────────────────────────────────────────

pub fn print_validation(label: &str, report: &ValidationReport) {
    println!("\n{} {}", "VALIDATION".bold().yellow(), label);
    println!("  Locale: {}", report.locale);
    println!(
        "  Messages: {} ({} finished, {} drafts, {} untranslated)",
        report.stats.messages, report.stats.finished, report.stats.drafts, report.stats.untranslated
    );
    if report.stats.obsolete_skipped > 0 {
        println!("  Obsolete entries skipped: {}", report.stats.obsolete_skipped);
    }
    if report.stats.unknown_elements > 0 {
        println!("  Unknown elements skipped: {}", report.stats.unknown_elements);
    }

    if report.findings.is_empty() {
        println!("  {}", "No findings".green());
        return;
    }
    println!("  Findings: {}", report.findings.len());
    for finding in &report.findings {
        let tag = match finding.severity {
            FindingSeverity::Warning => "WARN".yellow(),
            FindingSeverity::Info => "INFO".blue(),
        };
        println!(
            "    [{}] {} / '{}': {}",
            tag,
            finding.context,
            truncate(&finding.source, 48),
            finding.detail
        );
    }
}

pub fn print_coverage(label: &str, report: &CoverageReport) {
    println!("\n{} {}", "COVERAGE".bold().yellow(), label);
    println!("  Locale: {}", report.locale);
    let percent = format!("{:.1}%", report.coverage_percent);
    let percent = if report.coverage_percent >= 90.0 {
        percent.green()
    } else if report.coverage_percent >= 50.0 {
        percent.yellow()
    } else {
        percent.red()
    };
    println!(
        "  Finished: {}/{} ({}) — {} drafts, {} untranslated",
        report.finished, report.total_messages, percent, report.drafts, report.untranslated
    );
    for context in &report.contexts {
        if context.finished == context.total() {
            continue;
        }
        println!(
            "    {:32} {}/{} finished",
            context.name,
            context.finished,
            context.total()
        );
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}…", head)
    }
}
