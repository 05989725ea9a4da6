//! Independent lineup requests solved side by side.
//!
//! Each request is a pure computation with its own working state, so a batch
//! is a plain parallel map; results come back in request order.

use rayon::prelude::*;
use serde::Serialize;

use crate::optimizer::{optimize_lineup, LineupError, LineupOptions, LineupRequest, LineupResult};
use crate::parallel::pool::WorkerPool;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Ok {
        lineup: LineupResult,
    },
    Error {
        field: &'static str,
        message: String,
    },
}

impl From<Result<LineupResult, LineupError>> for BatchOutcome {
    fn from(result: Result<LineupResult, LineupError>) -> Self {
        match result {
            Ok(lineup) => Self::Ok { lineup },
            Err(err) => Self::Error {
                field: err.field(),
                message: err.to_string(),
            },
        }
    }
}

/// Solve every request on `pool`. One rejected request does not affect the others.
pub fn solve_batch(
    requests: &[LineupRequest],
    options: &LineupOptions,
    pool: &WorkerPool,
) -> Vec<Result<LineupResult, LineupError>> {
    pool.install(|| {
        requests
            .par_iter()
            .map(|request| optimize_lineup(request, options))
            .collect()
    })
}
