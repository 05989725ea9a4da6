//! Participant pools read from roster exports (JSON or CSV).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boat::{Capability, CapabilitySet, Participant, ParticipantId, Weight};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse roster JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse roster CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("record {index} (id {id}): {message}")]
    Record {
        index: usize,
        id: u64,
        message: String,
    },
}

/// One roster row before any checks. Weight and capability tags are kept raw so
/// validation can report every problem instead of stopping at the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub id: u64,
    pub weight: f64,
    #[serde(default, alias = "caps")]
    pub capabilities: Vec<String>,
    #[serde(default, alias = "isSubstitute", alias = "substitute")]
    pub is_substitute: bool,
}

impl RosterRecord {
    pub fn to_participant(&self, index: usize) -> Result<Participant, RosterError> {
        let record_error = |message: String| RosterError::Record {
            index,
            id: self.id,
            message,
        };
        let weight = Weight::new(self.weight).map_err(|err| record_error(err.to_string()))?;
        let mut capabilities = CapabilitySet::EMPTY;
        for tag in &self.capabilities {
            let capability = Capability::parse(tag)
                .ok_or_else(|| record_error(format!("unknown capability '{tag}'")))?;
            capabilities.insert(capability);
        }
        Ok(Participant {
            id: ParticipantId(self.id),
            weight,
            capabilities,
            is_substitute: self.is_substitute,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Records(Vec<RosterRecord>),
    Wrapped { participants: Vec<RosterRecord> },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: u64,
    weight: f64,
    #[serde(default)]
    capabilities: String,
    #[serde(default)]
    substitute: String,
}

/// Read raw records; `.csv` files go through the CSV reader, anything else is JSON.
pub fn load_roster_records(path: impl AsRef<Path>) -> Result<Vec<RosterRecord>, RosterError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        parse_roster_csv(&raw)
    } else {
        parse_roster_json(&raw)
    }
}

/// Read a roster and convert it into participants, failing on the first bad record.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<Participant>, RosterError> {
    into_participants(&load_roster_records(path)?)
}

pub fn into_participants(records: &[RosterRecord]) -> Result<Vec<Participant>, RosterError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.to_participant(index))
        .collect()
}

pub fn parse_roster_json(raw: &str) -> Result<Vec<RosterRecord>, RosterError> {
    let parsed: RosterFile = serde_json::from_str(raw)?;
    Ok(match parsed {
        RosterFile::Records(records) => records,
        RosterFile::Wrapped { participants } => participants,
    })
}

/// Columns: `id,weight,capabilities,substitute`. Capabilities are separated by
/// `|`, `;` or whitespace; substitute accepts `true/false`, `yes/no`, `1/0` or blank.
pub fn parse_roster_csv(raw: &str) -> Result<Vec<RosterRecord>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        let capabilities = row
            .capabilities
            .split(|c: char| c == '|' || c == ';' || c.is_whitespace())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        let is_substitute = matches!(
            row.substitute.to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        );
        records.push(RosterRecord {
            id: row.id,
            weight: row.weight,
            capabilities,
            is_substitute,
        });
    }
    Ok(records)
}
