//! checkstyle-rules CLI - command-line interface for rule naming and reporting
//!
//! Architecture: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to naming and report operations
//! - Handles external concerns like stdin, process exit codes, and terminal output

use anyhow::Context;
use checkstyle_rules::{
    report_from_file, report_options, OutputFormat, ReportFormatter, RuleConventions, RulesConfig,
    Severity,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

/// checkstyle-rules - rule names and categories for checkstyle audit events
#[derive(Parser)]
#[command(name = "checkstyle-rules")]
#[command(version)]
#[command(about = "Derive rule names and categories from checkstyle check classes")]
#[command(long_about = "Turns the fully qualified class names of checkstyle checks into rule names and categories, and summarizes audit events per rule.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rule name of each check class
    Name {
        /// Fully qualified check class names (read from stdin when omitted)
        sources: Vec<String>,
    },

    /// Print the rule category of each check class
    Category {
        /// Fully qualified check class names (read from stdin when omitted)
        sources: Vec<String>,
    },

    /// Print category and rule name of each check class, tab separated
    Classify {
        /// Fully qualified check class names (read from stdin when omitted)
        sources: Vec<String>,
    },

    /// Summarize audit events per rule
    Report {
        /// JSON or JSON Lines file with audit events ("-" for stdin)
        events: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Minimum severity level to report
        #[arg(short, long, value_enum)]
        severity: Option<SeverityArg>,

        /// Maximum number of rules to list
        #[arg(long)]
        max_rules: Option<usize>,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

#[derive(Copy, Clone)]
enum Derivation {
    Name,
    Category,
    Classify,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Name { sources } => run_derive(cli.config, sources, Derivation::Name),
        Commands::Category { sources } => run_derive(cli.config, sources, Derivation::Category),
        Commands::Classify { sources } => run_derive(cli.config, sources, Derivation::Classify),
        Commands::Report { events, format, severity, max_rules } => {
            run_report(cli.config, events, format, severity, max_rules, !cli.no_color)
        }
        Commands::ValidateConfig { config_file } => {
            Ok(run_validate_config(config_file.or(cli.config)))
        }
    }
}

fn load_config(config_path: Option<PathBuf>) -> anyhow::Result<RulesConfig> {
    let config = match config_path {
        Some(path) => RulesConfig::load_from_file(path)?,
        None => RulesConfig::discover(".")?,
    };
    Ok(config)
}

fn run_derive(
    config_path: Option<PathBuf>,
    sources: Vec<String>,
    derivation: Derivation,
) -> anyhow::Result<i32> {
    let config = load_config(config_path)?;

    let sources = if sources.is_empty() {
        read_stdin_lines().context("Failed to read check class names from stdin")?
    } else {
        sources
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in derive_lines(&config.conventions, &sources, derivation) {
        writeln!(out, "{line}")?;
    }

    Ok(0)
}

fn derive_lines(
    conventions: &RuleConventions,
    sources: &[String],
    derivation: Derivation,
) -> Vec<String> {
    sources
        .iter()
        .map(|source| match derivation {
            Derivation::Name => {
                conventions.name(Some(source.as_str())).unwrap_or_default().to_string()
            }
            Derivation::Category => {
                conventions.category(Some(source.as_str())).unwrap_or_default().to_string()
            }
            Derivation::Classify => {
                let id = conventions.classify(source);
                format!("{}\t{}", id.category, id.name)
            }
        })
        .collect()
}

fn read_stdin_lines() -> io::Result<Vec<String>> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

fn run_report(
    config_path: Option<PathBuf>,
    events: PathBuf,
    format: OutputFormatArg,
    severity: Option<SeverityArg>,
    max_rules: Option<usize>,
    use_colors: bool,
) -> anyhow::Result<i32> {
    let (formatted, exit_code) =
        render_report(config_path, events, format, severity, max_rules, use_colors)?;
    print!("{formatted}");
    Ok(exit_code)
}

/// Rendered report and the exit code it implies
fn render_report(
    config_path: Option<PathBuf>,
    events: PathBuf,
    format: OutputFormatArg,
    severity: Option<SeverityArg>,
    max_rules: Option<usize>,
    use_colors: bool,
) -> anyhow::Result<(String, i32)> {
    let config = load_config(config_path)?;

    let report = report_from_file(&events, &config)
        .with_context(|| format!("Failed to load audit events from {}", events.display()))?;

    let mut options = report_options(&config, use_colors);
    if let Some(severity) = severity {
        options.min_severity = Some(severity.into());
    }
    if max_rules.is_some() {
        options.max_rules = max_rules;
    }

    let formatter = ReportFormatter::new(options);
    let formatted = formatter.format_report(&report, format.into())?;

    let blocking = formatter.filter_events(&report.events).iter().any(|e| e.is_blocking());
    Ok((formatted, if blocking { 1 } else { 0 }))
}

fn run_validate_config(config_path: Option<PathBuf>) -> i32 {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("checkstyle_rules.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match RulesConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  Checks package: {}", config.conventions.checks_package);
            println!("  Check suffix: {}", config.conventions.check_suffix);
            println!(
                "  Categories: {} / {}",
                config.conventions.misc_category, config.conventions.extension_category
            );
            println!("  Fingerprint: {}", config.fingerprint());
            0
        }
        Err(e) => {
            eprintln!("Configuration validation failed: {e}");
            1
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sources() -> Vec<String> {
        vec![
            "com.puppycrawl.tools.checkstyle.checks.naming.ConstantNameCheck".to_string(),
            "com.puppycrawl.tools.checkstyle.checks.UpperEllCheck".to_string(),
            "org.other.FooCheck".to_string(),
            "FooCheck".to_string(),
        ]
    }

    #[test]
    fn test_derive_names() {
        let lines = derive_lines(&RuleConventions::default(), &sources(), Derivation::Name);
        assert_eq!(lines, vec!["ConstantName", "UpperEll", "Foo", "Foo"]);
    }

    #[test]
    fn test_derive_categories() {
        let lines = derive_lines(&RuleConventions::default(), &sources(), Derivation::Category);
        assert_eq!(lines, vec!["naming", "misc", "extension", "extension"]);
    }

    #[test]
    fn test_classify() {
        let lines = derive_lines(&RuleConventions::default(), &sources(), Derivation::Classify);
        assert_eq!(lines[0], "naming\tConstantName");
        assert_eq!(lines[3], "extension\tFoo");
    }

    #[test]
    fn test_report_command_exit_codes() {
        let temp_dir = TempDir::new().unwrap();
        let events = temp_dir.path().join("events.json");
        fs::write(
            &events,
            r#"[
                {"file": "A.java", "message": "m", "severity": "error", "source_name": "com.puppycrawl.tools.checkstyle.checks.naming.MethodNameCheck"},
                {"file": "B.java", "message": "m", "severity": "warning", "source_name": "org.acme.AcmeCheck"}
            ]"#,
        )
        .unwrap();
        let config = temp_dir.path().join("checkstyle_rules.yaml");
        fs::write(&config, "version: \"1.0\"\n").unwrap();

        let result = run_report(
            Some(config.clone()),
            events.clone(),
            OutputFormatArg::Json,
            None,
            None,
            false,
        );
        assert_eq!(result.unwrap(), 1);

        let (output, exit_code) =
            render_report(Some(config), events, OutputFormatArg::Json, None, None, false).unwrap();
        assert_eq!(exit_code, 1);
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_report_command_severity_filter() {
        let temp_dir = TempDir::new().unwrap();
        let events = temp_dir.path().join("events.json");
        fs::write(
            &events,
            r#"[
                {"file": "B.java", "message": "m", "severity": "warning", "source_name": "org.acme.AcmeCheck"},
                {"file": "C.java", "message": "m", "severity": "info", "source_name": "com.puppycrawl.tools.checkstyle.checks.TodoCommentCheck"}
            ]"#,
        )
        .unwrap();
        let config = temp_dir.path().join("checkstyle_rules.yaml");
        fs::write(&config, "{}\n").unwrap();

        let (output, exit_code) = render_report(
            Some(config),
            events,
            OutputFormatArg::Json,
            Some(SeverityArg::Error),
            None,
            false,
        )
        .unwrap();

        assert_eq!(exit_code, 0);
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(json["categories"].as_array().unwrap().is_empty());
        assert_eq!(json["summary"]["total"], 0);
    }

    #[test]
    fn test_report_command_without_errors() {
        let temp_dir = TempDir::new().unwrap();
        let events = temp_dir.path().join("events.jsonl");
        fs::write(
            &events,
            "{\"file\": \"B.java\", \"message\": \"m\", \"severity\": \"warning\", \"source_name\": \"org.acme.AcmeCheck\"}\n",
        )
        .unwrap();
        let config = temp_dir.path().join("checkstyle_rules.yaml");
        fs::write(&config, "{}\n").unwrap();

        let result =
            run_report(Some(config), events, OutputFormatArg::Github, None, None, false);
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_report_command_missing_events() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("checkstyle_rules.yaml");
        fs::write(&config, "{}\n").unwrap();

        let result = run_report(
            Some(config),
            temp_dir.path().join("missing.json"),
            OutputFormatArg::Human,
            None,
            None,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let valid = temp_dir.path().join("valid.yaml");
        let invalid = temp_dir.path().join("invalid.yaml");

        fs::write(&valid, RulesConfig::default().to_yaml().unwrap()).unwrap();
        fs::write(&invalid, "conventions:\n  misc_category: extension\n").unwrap();

        assert_eq!(run_validate_config(Some(valid)), 0);
        assert_eq!(run_validate_config(Some(invalid)), 1);
    }
}
