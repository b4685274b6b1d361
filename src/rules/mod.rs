//! Rule naming conventions for checkstyle checks
//!
//! Architecture: Pure Domain Service - derives display names and categories from check class names
//! - Operates on borrowed slices of the qualified identifier, never allocates
//! - Conventions are a value so third-party check packages can reuse the same derivation
//! - The free functions are the built-in checkstyle conventions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Package holding the built-in checkstyle checks
pub const CHECKS_PACKAGE: &str = "com.puppycrawl.tools.checkstyle.checks";

/// Suffix carried by check class names but not by rule names
pub const CHECK_SUFFIX: &str = "Check";

/// Category of checks living directly in the built-in checks package
pub const MISC_CATEGORY: &str = "misc";

/// Category of checks living outside the built-in checks package
pub const EXTENSION_CATEGORY: &str = "extension";

const SEPARATOR: char = '.';

/// Rule name of a check: the class name without package and without a trailing `Check`.
///
/// `rule_name(Some("com.puppycrawl.tools.checkstyle.checks.naming.ConstantNameCheck"))`
/// gives `Some("ConstantName")`.
pub fn rule_name(source_name: Option<&str>) -> Option<&str> {
    source_name.map(|source| derive_name(source, CHECK_SUFFIX))
}

/// Rule category of a check: the last package name, `misc` or `extension`.
///
/// An identifier without any separator sits in the default package and is
/// categorized as `extension`.
pub fn rule_category(source_name: Option<&str>) -> Option<&str> {
    source_name
        .map(|source| derive_category(source, CHECKS_PACKAGE, MISC_CATEGORY, EXTENSION_CATEGORY))
}

/// Last dot-separated segment, or the whole string when there is no separator
pub fn last_segment(identifier: &str) -> &str {
    identifier
        .rsplit_once(SEPARATOR)
        .map_or(identifier, |(_, last)| last)
}

/// Everything before the last separator; empty for the default package
pub fn package_portion(identifier: &str) -> &str {
    identifier
        .rsplit_once(SEPARATOR)
        .map_or("", |(package, _)| package)
}

fn derive_name<'a>(source: &'a str, suffix: &str) -> &'a str {
    let class_path = source.strip_suffix(suffix).unwrap_or(source);
    last_segment(class_path)
}

fn derive_category<'a>(
    source: &'a str,
    checks_package: &str,
    misc: &'a str,
    extension: &'a str,
) -> &'a str {
    let package = package_portion(source);

    if package == checks_package {
        misc
    } else if !package.starts_with(checks_package) {
        extension
    } else {
        last_segment(package)
    }
}

/// Naming conventions used to turn check class names into rule names and categories
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConventions {
    /// Package whose sub-packages name the rule categories
    pub checks_package: String,
    /// Suffix stripped from class names
    pub check_suffix: String,
    /// Category for checks directly inside `checks_package`
    pub misc_category: String,
    /// Category for checks outside `checks_package`
    pub extension_category: String,
}

impl Default for RuleConventions {
    fn default() -> Self {
        Self {
            checks_package: CHECKS_PACKAGE.to_string(),
            check_suffix: CHECK_SUFFIX.to_string(),
            misc_category: MISC_CATEGORY.to_string(),
            extension_category: EXTENSION_CATEGORY.to_string(),
        }
    }
}

impl RuleConventions {
    /// Rule name for a source name under these conventions
    pub fn name<'a>(&self, source_name: Option<&'a str>) -> Option<&'a str> {
        source_name.map(|source| derive_name(source, &self.check_suffix))
    }

    /// Rule category for a source name under these conventions
    pub fn category<'a>(&'a self, source_name: Option<&'a str>) -> Option<&'a str> {
        source_name.map(|source| {
            derive_category(
                source,
                &self.checks_package,
                &self.misc_category,
                &self.extension_category,
            )
        })
    }

    /// Owned name and category for a source name
    pub fn classify(&self, source_name: &str) -> RuleId {
        RuleId {
            category: derive_category(
                source_name,
                &self.checks_package,
                &self.misc_category,
                &self.extension_category,
            )
            .to_string(),
            name: derive_name(source_name, &self.check_suffix).to_string(),
        }
    }

    /// Whether the check belongs to the built-in checks package or one of its sub-packages
    pub fn is_builtin(&self, source_name: &str) -> bool {
        package_portion(source_name).starts_with(self.checks_package.as_str())
    }
}

/// A rule identified by its category and name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId {
    pub category: String,
    pub name: String,
}

impl RuleId {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self { category: category.into(), name: name.into() }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}
