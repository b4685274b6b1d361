//! Checkstyle rule naming - derive rule names and categories from checkstyle audit events
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure naming logic lives in `rules`, free of any I/O
//! - Events come in through `ingest`, leave through `report`
//! - Configuration only ever parameterizes the naming conventions and report defaults

pub mod config;
pub mod domain;
pub mod ingest;
pub mod report;
pub mod rules;

// Re-export main types for convenient access
pub use domain::events::{AuditEvent, RuleError, RuleResult, Severity};

pub use config::{ConfigBuilder, ReportConfig, RulesConfig};

pub use report::{OutputFormat, ReportFormatter, ReportOptions, RuleReport, RuleSummary};

pub use rules::{rule_category, rule_name, RuleConventions, RuleId};

use std::path::Path;

/// Build a report from an event file using the given configuration
pub fn report_from_file<P: AsRef<Path>>(path: P, config: &RulesConfig) -> RuleResult<RuleReport> {
    let events = ingest::load_events(path)?;
    Ok(RuleReport::new(events, config.conventions.clone()))
}

/// Formatter options seeded from the configuration's report defaults
pub fn report_options(config: &RulesConfig, use_colors: bool) -> ReportOptions {
    ReportOptions {
        use_colors,
        min_severity: config.report.min_severity,
        max_rules: config.report.max_rules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_report_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let events_file = temp_dir.path().join("events.jsonl");
        fs::write(
            &events_file,
            concat!(
                r#"{"file": "A.java", "message": "m", "source_name": "com.puppycrawl.tools.checkstyle.checks.naming.MethodNameCheck"}"#,
                "\n",
                r#"{"file": "A.java", "message": "m", "severity": "info", "source_name": "org.acme.AcmeCheck"}"#,
                "\n"
            ),
        )
        .unwrap();

        let report = report_from_file(&events_file, &RulesConfig::default()).unwrap();
        let summary = report.summary();

        assert!(report.has_errors());
        assert_eq!(summary.rule("naming", "MethodName").unwrap().counts.error, 1);
        assert_eq!(summary.rule("extension", "Acme").unwrap().counts.info, 1);
    }

    #[test]
    fn test_report_uses_configured_conventions() {
        let temp_dir = TempDir::new().unwrap();
        let events_file = temp_dir.path().join("events.json");
        fs::write(
            &events_file,
            r#"[{"file": "A.java", "message": "m", "source_name": "org.acme.lint.style.TabsRule"}]"#,
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .checks_package("org.acme.lint")
            .check_suffix("Rule")
            .build()
            .unwrap();
        let report = report_from_file(&events_file, &config).unwrap();

        assert!(report.summary().rule("style", "Tabs").is_some());
    }

    #[test]
    fn test_report_options_follow_config() {
        let config = ConfigBuilder::new().min_severity(Severity::Warning).max_rules(3).build().unwrap();
        let options = report_options(&config, false);

        assert!(!options.use_colors);
        assert_eq!(options.min_severity, Some(Severity::Warning));
        assert_eq!(options.max_rules, Some(3));
    }
}
