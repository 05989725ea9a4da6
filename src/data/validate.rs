use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::boat::Capability;
use crate::data::roster::{load_roster_records, RosterError, RosterRecord};

/// Weights outside this range (kg) are probably data-entry mistakes.
const PLAUSIBLE_WEIGHT_KG: std::ops::RangeInclusive<f64> = 30.0..=200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_roster_file(path: impl AsRef<Path>) -> Result<ValidationReport, RosterError> {
    Ok(validate_roster(&load_roster_records(path)?))
}

/// Check a roster before it is handed to the optimizer.
///
/// Errors would make a lineup request fail; warnings and info flag rosters that
/// will solve but probably not as the coach expects.
pub fn validate_roster(records: &[RosterRecord]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids = HashSet::new();
    let mut has_drummer = false;
    let mut has_steerer = false;

    for (index, record) in records.iter().enumerate() {
        let context = format!("entry[{index}] id={}", record.id);

        if !seen_ids.insert(record.id) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate id {}", record.id),
            );
        }

        if !record.weight.is_finite() || record.weight <= 0.0 {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.weight"),
                format!("weight must be positive, got {}", record.weight),
            );
        } else if !PLAUSIBLE_WEIGHT_KG.contains(&record.weight) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.weight"),
                format!(
                    "weight {} kg is outside {}-{} kg",
                    record.weight,
                    PLAUSIBLE_WEIGHT_KG.start(),
                    PLAUSIBLE_WEIGHT_KG.end()
                ),
            );
        }

        if record.capabilities.is_empty() {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.capabilities"),
                "no capabilities; participant can only be seated by a lock",
            );
        }
        for tag in &record.capabilities {
            match Capability::parse(tag) {
                Some(Capability::Drum) => has_drummer = true,
                Some(Capability::Steer) => has_steerer = true,
                Some(_) => {}
                None => report.push(
                    ValidationSeverity::Error,
                    format!("{context}.capabilities"),
                    format!("unknown capability '{tag}'"),
                ),
            }
        }
    }

    if !has_drummer {
        report.push(ValidationSeverity::Info, "roster", "nobody can drum");
    }
    if !has_steerer {
        report.push(ValidationSeverity::Info, "roster", "nobody can steer");
    }

    report
}
