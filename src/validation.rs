//! Validation System - Minimal Shape Checks on Row Data
//!
//! Rules produce structured violations.
//! Nothing here blocks a build; only `check` turns errors into an exit code.

use serde::{Deserialize, Serialize};

use crate::data::{self, FLAG_SENTINEL};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    /// 1-based line in the data file
    pub line: Option<usize>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    /// Rows that will become labels
    pub rows: usize,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn count(&self, severity: ViolationSeverity) -> usize {
        self.violations.iter().filter(|v| v.severity == severity).count()
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, data: &str) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct HeaderRule;

impl ValidationRule for HeaderRule {
    fn name(&self) -> &'static str { "header" }

    fn validate(&self, data: &str) -> Vec<ValidationViolation> {
        let Some(header) = data::header_line(data) else {
            return vec![];
        };
        let cols = data::split_record(header);
        if cols.len() < 2 {
            return vec![ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("Header has {} column(s), expected id,url[,flagA,flagB]", cols.len()),
                line: Some(1),
                remediation: vec!["First line is always discarded; make it a header row".to_string()],
            }];
        }
        vec![]
    }
}

pub struct ColumnCountRule;

impl ValidationRule for ColumnCountRule {
    fn name(&self) -> &'static str { "column_count" }

    fn validate(&self, data: &str) -> Vec<ValidationViolation> {
        data::record_lines(data)
            .filter(|(_, line)| !line.is_empty())
            .filter(|(_, line)| data::split_record(line).len() < 2)
            .map(|(n, _)| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: "Row has fewer than 2 columns and will be skipped".to_string(),
                line: Some(n),
                remediation: vec!["Provide at least id and url".to_string()],
            })
            .collect()
    }
}

pub struct QuotedDelimiterRule;

impl ValidationRule for QuotedDelimiterRule {
    fn name(&self) -> &'static str { "quoted_delimiter" }

    fn validate(&self, data: &str) -> Vec<ValidationViolation> {
        data::record_lines(data)
            .filter(|(_, line)| has_quoted_delimiter(line))
            .map(|(n, _)| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: "Quoted field contains a comma; it will be split at render time".to_string(),
                line: Some(n),
                remediation: vec!["Remove commas from field values".to_string()],
            })
            .collect()
    }
}

fn has_quoted_delimiter(line: &str) -> bool {
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            data::DELIMITER if in_quotes => return true,
            _ => {}
        }
    }
    false
}

pub struct FlagValueRule;

impl ValidationRule for FlagValueRule {
    fn name(&self) -> &'static str { "flag_value" }

    fn validate(&self, data: &str) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for (n, line) in data::record_lines(data) {
            let cols = data::split_record(line);
            for col in cols.iter().skip(2).take(2) {
                let value = col.replace('"', "");
                if !value.is_empty() && value != FLAG_SENTINEL && value != "No" {
                    violations.push(ValidationViolation {
                        rule: self.name().to_string(),
                        severity: ViolationSeverity::Info,
                        message: format!("Flag value {:?} is treated as false", value),
                        line: Some(n),
                        remediation: vec![format!("Use exactly \"{}\" to set a flag", FLAG_SENTINEL)],
                    });
                }
            }
        }
        violations
    }
}

pub struct NonEmptyRule;

impl ValidationRule for NonEmptyRule {
    fn name(&self) -> &'static str { "non_empty" }

    fn validate(&self, data: &str) -> Vec<ValidationViolation> {
        if data::parse_rows(data).is_empty() {
            vec![ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: "No usable rows; the sheet would contain no labels".to_string(),
                line: None,
                remediation: vec!["Add rows below the header".to_string()],
            }]
        } else {
            vec![]
        }
    }
}

/// Validator orchestrates rules
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(HeaderRule),
                Box::new(ColumnCountRule),
                Box::new(QuotedDelimiterRule),
                Box::new(FlagValueRule),
                Box::new(NonEmptyRule),
            ],
        }
    }

    pub fn validate(&self, data: &str) -> ValidationResult {
        let mut all_violations = vec![];

        for rule in &self.rules {
            all_violations.extend(rule.validate(data));
        }

        let valid = !all_violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        ValidationResult {
            valid,
            violations: all_violations,
            rows: data::parse_rows(data).len(),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
