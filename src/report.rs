//! Output formatting for unilint results.
//!
//! Supports four output formats:
//! - Pretty: colored terminal output for human readability
//! - Text: one line per diagnostic, for editors and grep
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::checkers::MessageId;
use crate::lint::{Diagnostic, LintResult, Severity, SuppressedDiagnostic, SuppressionType};

// =============================================================================
// Text Format
// =============================================================================

/// Format one diagnostic as `path:line[:col]: CODE: message (symbol)`.
pub fn format_text_line(d: &Diagnostic) -> String {
    let position = match d.column {
        Some(col) => format!("{}:{}", d.line, col),
        None => d.line.to_string(),
    };
    format!(
        "{}:{}: {}: {} ({})",
        d.file,
        position,
        d.code(),
        d.message,
        d.symbol()
    )
}

/// Render every diagnostic, then every file error, one per line.
pub fn render_text(result: &LintResult) -> String {
    let mut out = String::new();
    for d in &result.diagnostics {
        out.push_str(&format_text_line(d));
        out.push('\n');
    }
    for e in &result.errors {
        let _ = writeln!(out, "{}: error: {}", e.file, e.error);
    }
    out
}

pub fn write_text(result: &LintResult) {
    print!("{}", render_text(result));
}

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub paths: Vec<String>,
    pub passed: bool,
    pub files_scanned: usize,
    pub diagnostics: Vec<JsonDiagnostic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedDiagnostic>,
    pub suppressed_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonFileError>,
    pub summary: Vec<SummaryEntry>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub code: String,
    pub symbol: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
}

/// Count of diagnostics for one message.
#[derive(Serialize, Deserialize)]
pub struct SummaryEntry {
    pub code: String,
    pub symbol: String,
    pub count: usize,
}

/// Suppressed diagnostic with suppression info.
#[derive(Serialize, Deserialize)]
pub struct JsonSuppressedDiagnostic {
    pub diagnostic: JsonDiagnostic,
    pub suppression: JsonSuppression,
}

/// Suppression directive info.
#[derive(Serialize, Deserialize)]
pub struct JsonSuppression {
    pub rules: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub suppression_type: SuppressionType,
}

#[derive(Serialize, Deserialize)]
pub struct JsonFileError {
    pub file: String,
    pub error: String,
}

/// Build the JSON report for a run.
pub fn build_json_report(paths: &[String], result: &LintResult) -> JsonReport {
    let suppressed = result
        .suppressed
        .iter()
        .map(|sd| JsonSuppressedDiagnostic {
            diagnostic: diagnostic_to_json(&sd.diagnostic),
            suppression: JsonSuppression {
                rules: sd.suppression.rules.clone(),
                reason: sd.suppression.reason.clone(),
                line: sd.suppression.line,
                suppression_type: sd.suppression.suppression_type,
            },
        })
        .collect();

    let summary = result
        .count_by_message()
        .into_iter()
        .map(|(id, count)| SummaryEntry {
            code: id.code().to_string(),
            symbol: id.symbol().to_string(),
            count,
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        paths: paths.to_vec(),
        passed: result.passed(),
        files_scanned: result.scanned,
        diagnostics: result.diagnostics.iter().map(diagnostic_to_json).collect(),
        suppressed,
        suppressed_count: result.suppressed_count(),
        errors: result
            .errors
            .iter()
            .map(|e| JsonFileError {
                file: e.file.clone(),
                error: e.error.clone(),
            })
            .collect(),
        summary,
    }
}

pub fn render_json(paths: &[String], result: &LintResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&build_json_report(paths, result))?)
}

/// Write results in JSON format.
pub fn write_json(paths: &[String], result: &LintResult) -> anyhow::Result<()> {
    println!("{}", render_json(paths, result)?);
    Ok(())
}

fn diagnostic_to_json(d: &Diagnostic) -> JsonDiagnostic {
    JsonDiagnostic {
        code: d.code().to_string(),
        symbol: d.symbol().to_string(),
        severity: d.severity.to_string(),
        file: d.file.clone(),
        line: d.line,
        column: d.column,
        message: d.message.clone(),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "unilint";
const INFO_URI: &str = "https://github.com/zen-systems/unilint";

#[derive(Serialize, Deserialize)]
struct SarifReport {
    version: String,
    #[serde(rename = "$schema")]
    schema: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(rename = "informationUri")]
    information_uri: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
struct SarifRule {
    id: String,
    name: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "fullDescription")]
    full_description: SarifMessage,
    #[serde(rename = "helpUri")]
    help_uri: String,
    #[serde(rename = "defaultConfiguration")]
    default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
struct SarifRuleConfig {
    level: String,
}

#[derive(Serialize, Deserialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifact,
    region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
struct SarifArtifact {
    uri: String,
}

#[derive(Serialize, Deserialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn", skip_serializing_if = "Option::is_none")]
    start_column: Option<usize>,
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.as_os_str().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // Single file scan: keep just the file name
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

fn sarif_rule(id: MessageId) -> SarifRule {
    let def = id.def();
    SarifRule {
        id: def.code.to_string(),
        name: def.symbol.to_string(),
        short_description: SarifMessage {
            text: def.template.to_string(),
        },
        full_description: SarifMessage {
            text: def.description.to_string(),
        },
        help_uri: format!("{}#{}", INFO_URI, def.symbol),
        default_config: SarifRuleConfig {
            level: map_severity_to_level(id.severity()).to_string(),
        },
    }
}

/// Render results in SARIF format. Rules cover the messages that occur.
pub fn render_sarif(base_path: &Path, result: &LintResult) -> anyhow::Result<String> {
    let rule_ids: BTreeSet<MessageId> = result.diagnostics.iter().map(|d| d.id).collect();
    let rules = rule_ids.into_iter().map(sarif_rule).collect();

    let results = result
        .diagnostics
        .iter()
        .map(|d| SarifResult {
            rule_id: d.code().to_string(),
            level: map_severity_to_level(d.severity).to_string(),
            message: SarifMessage {
                text: d.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: make_relative_path(&d.file, base_path),
                    },
                    region: SarifRegion {
                        start_line: d.line.max(1),
                        start_column: d.column,
                    },
                },
            }],
        })
        .collect();

    let report = SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: INFO_URI.to_string(),
                    rules,
                },
            },
            results,
        }],
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, result: &LintResult) -> anyhow::Result<()> {
    println!("{}", render_sarif(base_path, result)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Render results in pretty (human-readable) format.
pub fn render_pretty(paths: &[String], result: &LintResult, show_suppressed: bool) -> String {
    let mut out = String::new();

    // Header
    let _ = writeln!(out);
    let _ = writeln!(out, "  {} v{}", "unilint".cyan().bold(), env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}{}", "Scanning: ".dimmed(), paths.join(", "));
    let _ = writeln!(out);

    write_result_summary(&mut out, result);
    let _ = writeln!(out);

    if !result.diagnostics.is_empty() {
        write_diagnostics(&mut out, &result.diagnostics);
    }

    if !result.errors.is_empty() {
        let _ = writeln!(out, "  {} ({}):", "Errors".red().bold(), result.errors.len());
        for e in &result.errors {
            let _ = writeln!(out, "    {}  {}", e.file.blue(), e.error);
        }
        let _ = writeln!(out);
    }

    if !result.suppressed.is_empty() {
        write_suppressed_summary(&mut out, &result.suppressed, show_suppressed);
        let _ = writeln!(out);
    }

    if !result.diagnostics.is_empty() {
        write_breakdown(&mut out, result);
        let _ = writeln!(out);
    }

    out
}

pub fn write_pretty(paths: &[String], result: &LintResult, show_suppressed: bool) {
    print!("{}", render_pretty(paths, result, show_suppressed));
}

fn write_result_summary(out: &mut String, result: &LintResult) {
    if result.passed() {
        let _ = write!(out, "  {}", "✓ PASS".green());
    } else {
        let _ = write!(out, "  {}", "✗ FAIL".red());
    }

    let plural = if result.scanned != 1 { "s" } else { "" };
    let _ = write!(
        out,
        "  {} file{} scanned, {} diagnostic{}",
        result.scanned,
        plural,
        result.diagnostics.len(),
        if result.diagnostics.len() != 1 { "s" } else { "" }
    );

    if result.suppressed_count() > 0 {
        let _ = write!(
            out,
            "  {}",
            format!("({} suppressed)", result.suppressed_count()).dimmed()
        );
    }
    let _ = writeln!(out);
}

fn write_diagnostics(out: &mut String, diagnostics: &[Diagnostic]) {
    let _ = writeln!(out, "  {} ({}):", "Diagnostics".bold(), diagnostics.len());
    let _ = writeln!(out);

    for d in diagnostics {
        let tag = match d.severity {
            Severity::Error => "ERROR".red(),
            Severity::Warning => "WARN ".yellow(),
            Severity::Info => "INFO ".blue(),
        };
        let location = match d.column {
            Some(col) => format!(":{}:{}", d.line, col),
            None => format!(":{}", d.line),
        };
        let _ = writeln!(
            out,
            "    {} {}  {}{}",
            tag,
            d.code().dimmed(),
            d.file.blue(),
            location.dimmed()
        );
        // Message on next line, indented
        let _ = writeln!(out, "          {} ({})", d.message, d.symbol());
        let _ = writeln!(out);
    }
}

fn write_breakdown(out: &mut String, result: &LintResult) {
    let _ = writeln!(out, "  {}", "Breakdown:".bold());
    for (id, count) in result.count_by_message() {
        let _ = writeln!(out, "    {} {:<36} {:>4}", id.code(), id.symbol(), count);
    }
}

fn write_suppressed_summary(out: &mut String, suppressed: &[SuppressedDiagnostic], show_details: bool) {
    let _ = writeln!(out, "  {} ({}):", "Suppressed".dimmed(), suppressed.len());

    if !show_details {
        let _ = writeln!(out, "    {}", "(use --show-suppressed to see details)".dimmed());
        return;
    }

    let _ = writeln!(out);
    for sd in suppressed {
        let d = &sd.diagnostic;
        let s = &sd.suppression;

        let location = if s.suppression_type == SuppressionType::File {
            ":* (file)".to_string()
        } else {
            format!(":{}", d.line)
        };
        let _ = writeln!(out, "    {}  {}{}", d.code().dimmed(), d.file.blue(), location.dimmed());

        if !s.reason.is_empty() {
            let _ = writeln!(out, "          {}", format!("reason: {:?}", s.reason).dimmed());
        }
    }
}
