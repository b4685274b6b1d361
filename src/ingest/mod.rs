//! Loading audit events from JSON input
//!
//! Architecture: Anti-Corruption Layer - external event dumps become domain AuditEvents
//! - Accepts a single JSON array or JSON Lines, one event per line
//! - Parse failures report the offending line

use crate::domain::events::{AuditEvent, RuleError, RuleResult};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Path that stands for standard input
pub const STDIN_PATH: &str = "-";

/// Parse events from a JSON array or JSON Lines document
pub fn parse_events(content: &str) -> RuleResult<Vec<AuditEvent>> {
    let trimmed = content.trim_start();

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        parse_array(content)
    } else {
        parse_lines(content)
    }
}

/// Load events from a file, or from standard input when the path is `-`
pub fn load_events<P: AsRef<Path>>(path: P) -> RuleResult<Vec<AuditEvent>> {
    let path = path.as_ref();

    let content = if path == Path::new(STDIN_PATH) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };

    let events = parse_events(&content)?;
    tracing::debug!("Loaded {} audit events from {}", events.len(), path.display());
    Ok(events)
}

fn parse_array(content: &str) -> RuleResult<Vec<AuditEvent>> {
    serde_json::from_str(content).map_err(|e| RuleError::parse(e.line(), e.to_string()))
}

fn parse_lines(content: &str) -> RuleResult<Vec<AuditEvent>> {
    let mut events = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let event: AuditEvent = serde_json::from_str(line)
            .map_err(|e| RuleError::parse(index + 1, e.to_string()))?;
        events.push(event);
    }

    Ok(events)
}
