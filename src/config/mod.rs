//! Configuration loading and management for checkstyle rule reporting
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain objects
//! - Every section defaults, so an empty file is a valid configuration

use crate::domain::events::{RuleError, RuleResult, Severity};
use crate::rules::RuleConventions;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File names probed in the working directory when no config is given
pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["checkstyle_rules.yaml", "checkstyle_rules.yml", ".checkstyle_rules.yaml"];

const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,
    /// How check class names map to rule names and categories
    #[serde(default)]
    pub conventions: RuleConventions,
    /// Report defaults, overridable from the command line
    #[serde(default)]
    pub report: ReportConfig,
}

/// Report defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Minimum severity included in reports
    pub min_severity: Option<Severity>,
    /// Maximum number of rules listed
    pub max_rules: Option<usize>,
}

impl RulesConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RuleResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            RuleError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            RuleError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> RuleResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| RuleError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first default config file present in `dir`, or the built-in defaults
    pub fn discover<P: AsRef<Path>>(dir: P) -> RuleResult<Self> {
        for name in DEFAULT_CONFIG_FILES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                return Self::load_from_file(candidate);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> RuleResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(RuleError::config(format!(
                "Unsupported configuration version: {}. Supported versions: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        }

        let conventions = &self.conventions;

        let package = package_pattern()?;
        if !package.is_match(&conventions.checks_package) {
            return Err(RuleError::config(format!(
                "Invalid checks_package '{}': expected a dotted package path",
                conventions.checks_package
            )));
        }

        let suffix = identifier_pattern()?;
        if !conventions.check_suffix.is_empty() && !suffix.is_match(&conventions.check_suffix) {
            return Err(RuleError::config(format!(
                "Invalid check_suffix '{}': expected identifier characters only",
                conventions.check_suffix
            )));
        }

        if conventions.misc_category.trim().is_empty()
            || conventions.extension_category.trim().is_empty()
        {
            return Err(RuleError::config("Category labels must not be empty"));
        }

        if conventions.misc_category == conventions.extension_category {
            return Err(RuleError::config(format!(
                "misc_category and extension_category must differ, both are '{}'",
                conventions.misc_category
            )));
        }

        if self.report.max_rules == Some(0) {
            return Err(RuleError::config("report.max_rules must be at least 1"));
        }

        Ok(())
    }

    /// Convert to YAML for display or writing back
    pub fn to_yaml(&self) -> RuleResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| RuleError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.version.hash(&mut hasher);
        self.conventions.hash(&mut hasher);
        self.report.hash(&mut hasher);

        format!("{:x}", hasher.finish())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            conventions: RuleConventions::default(),
            report: ReportConfig::default(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn package_pattern() -> RuleResult<Regex> {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .map_err(|e| RuleError::config(format!("Invalid package pattern: {e}")))
}

fn identifier_pattern() -> RuleResult<Regex> {
    Regex::new(r"^[A-Za-z0-9_$]+$")
        .map_err(|e| RuleError::config(format!("Invalid identifier pattern: {e}")))
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: RulesConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: RulesConfig::default() }
    }

    /// Set the package holding the built-in checks
    pub fn checks_package(mut self, package: impl Into<String>) -> Self {
        self.config.conventions.checks_package = package.into();
        self
    }

    /// Set the suffix stripped from check class names
    pub fn check_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.conventions.check_suffix = suffix.into();
        self
    }

    /// Set both category sentinels
    pub fn categories(mut self, misc: impl Into<String>, extension: impl Into<String>) -> Self {
        self.config.conventions.misc_category = misc.into();
        self.config.conventions.extension_category = extension.into();
        self
    }

    /// Set the default minimum severity
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.config.report.min_severity = Some(severity);
        self
    }

    /// Set the default rule limit
    pub fn max_rules(mut self, max: usize) -> Self {
        self.config.report.max_rules = Some(max);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> RuleResult<RulesConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{CHECKS_PACKAGE, EXTENSION_CATEGORY};
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = RulesConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.conventions.checks_package, CHECKS_PACKAGE);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = RulesConfig::load_from_str("{}").unwrap();
        assert_eq!(config, RulesConfig::default());
    }

    #[test]
    fn test_partial_conventions() {
        let config = RulesConfig::load_from_str(
            r#"
version: "1.0"
conventions:
  checks_package: org.acme.lint
report:
  min_severity: warning
  max_rules: 10
"#,
        )
        .unwrap();

        assert_eq!(config.conventions.checks_package, "org.acme.lint");
        assert_eq!(config.conventions.check_suffix, "Check");
        assert_eq!(config.conventions.extension_category, EXTENSION_CATEGORY);
        assert_eq!(config.report.min_severity, Some(Severity::Warning));
        assert_eq!(config.report.max_rules, Some(10));
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let err = RulesConfig::load_from_str("version: \"2.0\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported configuration version"));
    }

    #[test]
    fn test_rejects_invalid_conventions() {
        assert!(ConfigBuilder::new().checks_package("com..broken").build().is_err());
        assert!(ConfigBuilder::new().checks_package("").build().is_err());
        assert!(ConfigBuilder::new().check_suffix("Check!").build().is_err());
        assert!(ConfigBuilder::new().categories("same", "same").build().is_err());
        assert!(ConfigBuilder::new().categories(" ", "extension").build().is_err());
        assert!(ConfigBuilder::new().max_rules(0).build().is_err());
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .checks_package("org.acme.lint")
            .check_suffix("Rule")
            .categories("general", "thirdparty")
            .min_severity(Severity::Info)
            .max_rules(5)
            .build()
            .unwrap();

        assert_eq!(config.conventions.name(Some("org.acme.lint.TabsRule")), Some("Tabs"));
        assert_eq!(config.conventions.category(Some("org.acme.lint.TabsRule")), Some("general"));
    }

    #[test]
    fn test_load_and_discover() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(RulesConfig::discover(temp_dir.path()).unwrap(), RulesConfig::default());

        let config = ConfigBuilder::new().checks_package("org.acme.lint").build().unwrap();
        fs::write(temp_dir.path().join("checkstyle_rules.yml"), config.to_yaml().unwrap()).unwrap();

        let discovered = RulesConfig::discover(temp_dir.path()).unwrap();
        assert_eq!(discovered, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RulesConfig::load_from_file("/nonexistent/checkstyle_rules.yaml").unwrap_err();
        assert!(matches!(err, RuleError::Configuration { .. }));
    }

    #[test]
    fn test_fingerprint_changes_with_conventions() {
        let default = RulesConfig::default();
        let custom = ConfigBuilder::new().check_suffix("Rule").build().unwrap();

        assert_eq!(default.fingerprint(), RulesConfig::default().fingerprint());
        assert_ne!(default.fingerprint(), custom.fingerprint());
    }
}
