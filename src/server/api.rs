use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boat::{Seat, SeatLayout};
use crate::config::AppConfig;
use crate::optimizer::{optimize_lineup, LineupError, LineupRequest, LineupResult};
use crate::parallel::{solve_batch, BatchOutcome, WorkerPool};

const ENGINE: &str = "lineup_v1";
/// Largest number of requests accepted by one batch call.
const MAX_BATCH_REQUESTS: usize = 256;

#[derive(Debug, Clone, Serialize)]
pub struct LineupResponse {
    pub status: &'static str,
    pub engine: &'static str,
    pub lineup: LineupResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutResponse {
    pub status: &'static str,
    pub rows: usize,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<LineupRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub status: &'static str,
    pub engine: &'static str,
    pub results: Vec<BatchOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationErrorResponse {
    fn new(errors: Vec<ValidationIssue>) -> Self {
        Self {
            status: "error",
            message: "Validation failed",
            errors,
        }
    }
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid lineup request")]
    Validation(ValidationErrorResponse),
}

impl From<LineupError> for PayloadError {
    fn from(err: LineupError) -> Self {
        Self::Validation(ValidationErrorResponse::new(vec![ValidationIssue {
            field: err.field(),
            messages: vec![err.to_string()],
        }]))
    }
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "tiller-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /api/layout?rows=N`; rows defaults to the configured default.
pub fn layout_payload(path: &str, config: &AppConfig) -> Result<String, PayloadError> {
    let rows = match query_param(path, "rows") {
        None => config.lineup.default_rows as i64,
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            PayloadError::Validation(ValidationErrorResponse::new(vec![ValidationIssue {
                field: "rows",
                messages: vec![format!("'{raw}' is not an integer")],
            }]))
        })?,
    };
    check_limits(Some(rows), 0, config)?;
    // check_limits bounds rows to 1..=max_rows.
    let layout = SeatLayout::build(rows as usize)?;

    let response = LayoutResponse {
        status: "ok",
        rows: layout.rows(),
        seats: layout.seats().to_vec(),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

/// `POST /api/lineup`.
pub fn lineup_payload(body: &str, config: &AppConfig) -> Result<String, PayloadError> {
    let request: LineupRequest = serde_json::from_str(body)?;
    check_limits(request.rows, request.participants.len(), config)?;
    let lineup = optimize_lineup(&request, &config.lineup.options())?;

    let response = LineupResponse {
        status: "ok",
        engine: ENGINE,
        lineup,
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

/// `POST /api/lineup/batch`. Requests over the configured limits come back as
/// per-request errors rather than failing the batch.
pub fn batch_payload(body: &str, config: &AppConfig) -> Result<String, PayloadError> {
    let batch: BatchRequest = serde_json::from_str(body)?;
    if batch.requests.len() > MAX_BATCH_REQUESTS {
        return Err(PayloadError::Validation(ValidationErrorResponse::new(vec![
            ValidationIssue {
                field: "requests",
                messages: vec![format!("at most {MAX_BATCH_REQUESTS} requests per batch")],
            },
        ])));
    }

    let (within_limits, rejected): (Vec<_>, Vec<_>) = batch
        .requests
        .into_iter()
        .enumerate()
        .partition(|(_, request)| {
            check_limits(request.rows, request.participants.len(), config).is_ok()
        });
    let to_solve: Vec<LineupRequest> = within_limits.iter().map(|(_, request)| request.clone()).collect();
    let solved = solve_batch(
        &to_solve,
        &config.lineup.options(),
        &WorkerPool::with_workers(config.parallel.workers),
    );

    let mut results: Vec<(usize, BatchOutcome)> = within_limits
        .into_iter()
        .map(|(index, _)| index)
        .zip(solved.into_iter().map(BatchOutcome::from))
        .collect();
    results.extend(rejected.into_iter().map(|(index, request)| {
        let issue = limit_issues(request.rows, request.participants.len(), config)
            .into_iter()
            .next();
        let outcome = match issue {
            Some(issue) => BatchOutcome::Error {
                field: issue.field,
                message: issue.messages.join("; "),
            },
            None => BatchOutcome::Error {
                field: "requests",
                message: "request rejected".to_string(),
            },
        };
        (index, outcome)
    }));
    results.sort_by_key(|(index, _)| *index);

    let response = BatchResponse {
        status: "ok",
        engine: ENGINE,
        results: results.into_iter().map(|(_, outcome)| outcome).collect(),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

fn check_limits(rows: Option<i64>, pool_size: usize, config: &AppConfig) -> Result<(), PayloadError> {
    let errors = limit_issues(rows, pool_size, config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PayloadError::Validation(ValidationErrorResponse::new(errors)))
    }
}

/// Service limits on top of the optimizer's own validation.
fn limit_issues(rows: Option<i64>, pool_size: usize, config: &AppConfig) -> Vec<ValidationIssue> {
    let mut errors = Vec::new();
    let max_rows = config.lineup.max_rows as i64;
    if let Some(rows) = rows {
        if !(1..=max_rows).contains(&rows) {
            errors.push(ValidationIssue {
                field: "rows",
                messages: vec![format!("must be between 1 and {max_rows}")],
            });
        }
    }
    if pool_size > config.lineup.max_pool_size {
        errors.push(ValidationIssue {
            field: "participants",
            messages: vec![format!(
                "at most {} participants per request",
                config.lineup.max_pool_size
            )],
        });
    }
    errors
}

fn query_param<'a>(path: &'a str, key: &str) -> Option<&'a str> {
    let query = path.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name.trim() == key).then(|| value.trim())
    })
}
