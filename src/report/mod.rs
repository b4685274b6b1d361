//! Report generation with multiple output formats
//!
//! Architecture: Anti-Corruption Layer - formatters translate rule summaries to external formats
//! - RuleReport (domain) is converted to human, JSON or GitHub annotation output
//! - Filtering happens on events before aggregation so counts always agree with the listing

pub mod summary;

pub use summary::{CategoryEntry, RuleEntry, RuleSummary, SeverityCounts, UNKNOWN};

use crate::domain::events::{AuditEvent, RuleError, RuleResult, Severity};
use crate::rules::RuleConventions;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;

/// Supported output formats for rule reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format grouped by category
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// GitHub Actions workflow annotations, one per event
    GitHub,
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
    /// Maximum number of rules to list, busiest first
    pub max_rules: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, min_severity: None, max_rules: None }
    }
}

/// Audit events of one checkstyle run together with the conventions used to name their rules
#[derive(Debug, Clone)]
pub struct RuleReport {
    pub events: Vec<AuditEvent>,
    pub conventions: RuleConventions,
    pub generated_at: DateTime<Utc>,
}

impl RuleReport {
    pub fn new(events: Vec<AuditEvent>, conventions: RuleConventions) -> Self {
        Self { events, conventions, generated_at: Utc::now() }
    }

    /// Summary over all events
    pub fn summary(&self) -> RuleSummary {
        RuleSummary::from_events(&self.events, &self.conventions)
    }

    /// Whether any error-severity event is present
    pub fn has_errors(&self) -> bool {
        self.events.iter().any(AuditEvent::is_blocking)
    }
}

/// Main report formatter that dispatches to specific formatters
pub struct ReportFormatter {
    options: ReportOptions,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Events that pass the severity filter
    pub fn filter_events<'a>(&self, events: &'a [AuditEvent]) -> Vec<&'a AuditEvent> {
        events
            .iter()
            .filter(|e| e.severity.is_reported())
            .filter(|e| self.options.min_severity.map_or(true, |min| e.severity >= min))
            .collect()
    }

    /// Format a rule report in the specified format
    pub fn format_report(&self, report: &RuleReport, format: OutputFormat) -> RuleResult<String> {
        let events: Vec<AuditEvent> =
            self.filter_events(&report.events).into_iter().cloned().collect();

        match format {
            OutputFormat::GitHub => Ok(self.format_github(&events, &report.conventions)),
            OutputFormat::Human | OutputFormat::Json => {
                let summary = RuleSummary::from_events(&events, &report.conventions);
                let listed = self.listed_rules(&summary);
                if format == OutputFormat::Human {
                    Ok(self.format_human(&summary, &listed))
                } else {
                    self.format_json(report, &summary, &listed)
                }
            }
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &RuleReport,
        format: OutputFormat,
        mut writer: W,
    ) -> RuleResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    /// Rules to list, grouped by category, honoring `max_rules`
    fn listed_rules<'a>(
        &self,
        summary: &'a RuleSummary,
    ) -> BTreeMap<&'a str, Vec<(&'a str, &'a RuleEntry)>> {
        let mut rules: Vec<(&str, &str, &RuleEntry)> = summary
            .categories()
            .flat_map(|(category, entry)| {
                entry.rules.iter().map(move |(name, rule)| (category, name.as_str(), rule))
            })
            .collect();

        if let Some(max) = self.options.max_rules {
            rules.sort_by(|a, b| {
                b.2.counts
                    .total()
                    .cmp(&a.2.counts.total())
                    .then_with(|| a.0.cmp(b.0))
                    .then_with(|| a.1.cmp(b.1))
            });
            rules.truncate(max);
        }

        let mut grouped: BTreeMap<&str, Vec<(&str, &RuleEntry)>> = BTreeMap::new();
        for (category, name, rule) in rules {
            grouped.entry(category).or_default().push((name, rule));
        }
        for entries in grouped.values_mut() {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        grouped
    }

    /// Format report in human-readable format
    fn format_human(
        &self,
        summary: &RuleSummary,
        listed: &BTreeMap<&str, Vec<(&str, &RuleEntry)>>,
    ) -> String {
        let mut output = String::new();

        if summary.is_empty() {
            output.push_str(&self.paint("32", "No checkstyle rules violated"));
            output.push('\n');
        } else {
            output.push_str(&self.paint("1", "Rules"));
            output.push_str("\n\n");

            for (category, rules) in listed {
                output.push_str(&self.paint("1", category));
                output.push('\n');

                for (name, rule) in rules {
                    let color = match rule.counts.highest() {
                        Some(Severity::Error) => "31",
                        Some(Severity::Warning) => "33",
                        _ => "36",
                    };
                    output.push_str(&format!(
                        "  {} {}\n",
                        self.paint(color, &format!("{:<32}", name)),
                        describe_counts(&rule.counts)
                    ));
                }
                output.push('\n');
            }
        }

        output.push_str(&self.format_totals(summary));
        output
    }

    /// Format report in JSON format
    fn format_json(
        &self,
        report: &RuleReport,
        summary: &RuleSummary,
        listed: &BTreeMap<&str, Vec<(&str, &RuleEntry)>>,
    ) -> RuleResult<String> {
        let categories: Vec<JsonValue> = listed
            .iter()
            .map(|(category, rules)| {
                let rules: Vec<JsonValue> = rules
                    .iter()
                    .map(|(name, rule)| {
                        serde_json::json!({
                            "name": name,
                            "sources": rule.sources,
                            "error": rule.counts.error,
                            "warning": rule.counts.warning,
                            "info": rule.counts.info,
                            "total": rule.counts.total()
                        })
                    })
                    .collect();

                serde_json::json!({ "name": category, "rules": rules })
            })
            .collect();

        let totals = summary.totals();
        let json_report = serde_json::json!({
            "categories": categories,
            "summary": {
                "files": summary.file_count(),
                "rules": summary.rule_count(),
                "violations_by_severity": {
                    "error": totals.error,
                    "warning": totals.warning,
                    "info": totals.info
                },
                "total": totals.total(),
                "generated_at": report.generated_at.to_rfc3339()
            }
        });

        let mut json = serde_json::to_string_pretty(&json_report)
            .map_err(|e| RuleError::report(format!("JSON serialization failed: {e}")))?;
        json.push('\n');
        Ok(json)
    }

    /// Format events as GitHub Actions annotations
    fn format_github(&self, events: &[AuditEvent], conventions: &RuleConventions) -> String {
        let mut output = String::new();

        for event in events {
            let level = match event.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info | Severity::Ignore => "notice",
            };

            let position = match (event.line, event.column) {
                (Some(line), Some(col)) => format!(",line={line},col={col}"),
                (Some(line), None) => format!(",line={line}"),
                _ => String::new(),
            };

            let source = event.source_name.as_deref();
            let title = format!(
                "{}/{}",
                conventions.category(source).unwrap_or(UNKNOWN),
                conventions.name(source).unwrap_or(UNKNOWN)
            );

            output.push_str(&format!(
                "::{} file={},title={}{}::{}\n",
                level,
                escape_property(&event.file.display().to_string()),
                escape_property(&title),
                position,
                escape_data(&event.message)
            ));
        }

        output
    }

    /// Format the totals line
    fn format_totals(&self, summary: &RuleSummary) -> String {
        let totals = summary.totals();
        let label = if self.options.use_colors { "\x1b[1mSummary:\x1b[0m" } else { "Summary:" };

        if totals.total() == 0 {
            return format!("{label} 0 violations in {} files\n", summary.file_count());
        }

        format!(
            "{label} {} from {} rule{} in {} file{}\n",
            describe_counts(&totals),
            summary.rule_count(),
            plural(summary.rule_count()),
            summary.file_count(),
            plural(summary.file_count())
        )
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.options.use_colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

/// Escape a workflow command message
fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape a workflow command property value
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

fn describe_counts(counts: &SeverityCounts) -> String {
    let mut parts = Vec::new();
    if counts.error > 0 {
        parts.push(format!("{} error{}", counts.error, plural(counts.error)));
    }
    if counts.warning > 0 {
        parts.push(format!("{} warning{}", counts.warning, plural(counts.warning)));
    }
    if counts.info > 0 {
        parts.push(format!("{} info", counts.info));
    }
    parts.join(", ")
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
