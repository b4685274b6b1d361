//! Per-rule aggregation of audit events
//!
//! Architecture: Aggregate Root - RuleSummary owns the category → rule → counts tree
//! - Built once from a slice of events, read-only afterwards
//! - BTreeMaps keep categories and rules in name order for stable output

use crate::domain::events::{AuditEvent, Severity};
use crate::rules::RuleConventions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Category and rule used for events that carry no source name
pub const UNKNOWN: &str = "unknown";

/// Count of events by severity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    /// Total number of events across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    /// Whether there are any blocking events
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Add an event to the counts; ignored events are not counted
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
            Severity::Ignore => {}
        }
    }

    /// Highest severity with a non-zero count
    pub fn highest(&self) -> Option<Severity> {
        if self.error > 0 {
            Some(Severity::Error)
        } else if self.warning > 0 {
            Some(Severity::Warning)
        } else if self.info > 0 {
            Some(Severity::Info)
        } else {
            None
        }
    }
}

/// Events raised by one rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Fully qualified check classes mapped to this rule
    pub sources: BTreeSet<String>,
    pub counts: SeverityCounts,
}

/// Rules of one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub rules: BTreeMap<String, RuleEntry>,
}

impl CategoryEntry {
    /// Severity counts summed over the category's rules
    pub fn counts(&self) -> SeverityCounts {
        self.rules.values().fold(SeverityCounts::default(), |mut acc, rule| {
            acc.error += rule.counts.error;
            acc.warning += rule.counts.warning;
            acc.info += rule.counts.info;
            acc
        })
    }
}

/// Audit events grouped by rule category, then rule name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    categories: BTreeMap<String, CategoryEntry>,
    totals: SeverityCounts,
    files: BTreeSet<PathBuf>,
}

impl RuleSummary {
    /// Build a summary from events using the given naming conventions
    pub fn from_events(events: &[AuditEvent], conventions: &RuleConventions) -> Self {
        let mut summary = Self::default();
        let mut unnamed = 0usize;

        for event in events {
            if !event.severity.is_reported() {
                continue;
            }

            let source = event.source_name.as_deref();
            let category = conventions.category(source).unwrap_or(UNKNOWN);
            let name = conventions.name(source).unwrap_or(UNKNOWN);
            if source.is_none() {
                tracing::debug!("Event without source name: {}", event.format_display());
                unnamed += 1;
            }

            let rule = summary
                .categories
                .entry(category.to_string())
                .or_default()
                .rules
                .entry(name.to_string())
                .or_default();

            if let Some(source) = source {
                rule.sources.insert(source.to_string());
            }
            rule.counts.add(event.severity);
            summary.totals.add(event.severity);
            summary.files.insert(event.file.clone());
        }

        if unnamed > 0 {
            tracing::warn!("{} audit events carry no source name; counted as '{}'", unnamed, UNKNOWN);
        }
        tracing::debug!(
            "Summarized {} events into {} categories",
            summary.totals.total(),
            summary.categories.len()
        );

        summary
    }

    /// Categories in name order
    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryEntry)> {
        self.categories.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Look up a single category
    pub fn category(&self, name: &str) -> Option<&CategoryEntry> {
        self.categories.get(name)
    }

    /// Look up a single rule
    pub fn rule(&self, category: &str, name: &str) -> Option<&RuleEntry> {
        self.categories.get(category)?.rules.get(name)
    }

    /// Severity counts over all reported events
    pub fn totals(&self) -> SeverityCounts {
        self.totals
    }

    /// Number of distinct files with at least one reported event
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of distinct rules with at least one reported event
    pub fn rule_count(&self) -> usize {
        self.categories.values().map(|c| c.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.total() == 0
    }
}
