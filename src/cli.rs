use std::fs;
use std::str::FromStr;

use serde::Deserialize;

use crate::boat::SeatLayout;
use crate::config::AppConfig;
use crate::data::roster::load_roster;
use crate::data::validate::{validate_roster_file, ValidationSeverity};
use crate::optimizer::{optimize_lineup, LineupError, LineupRequest, LineupResult, Occupant};
use crate::parallel::{solve_batch, BatchOutcome, WorkerPool};
use crate::server;

const USAGE: &str = "usage: tiller <serve|solve|fill|layout|validate|batch>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Solve,
    Fill,
    Layout,
    Validate,
    Batch,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("solve") => Some(Command::Solve),
        Some("fill") => Some(Command::Fill),
        Some("layout") => Some(Command::Layout),
        Some("validate") => Some(Command::Validate),
        Some("batch") => Some(Command::Batch),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    match command {
        Command::Serve => handle_serve(config),
        Command::Solve => handle_solve(args, &config),
        Command::Fill => handle_fill(args, &config),
        Command::Layout => handle_layout(args, &config),
        Command::Validate => handle_validate(args),
        Command::Batch => handle_batch(args, &config),
    }
}

fn handle_serve(config: AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// `tiller solve <request.json> [--table]`
fn handle_solve(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: tiller solve <request.json> [--table]");
        return 2;
    };
    let request: LineupRequest = match read_json(path) {
        Ok(request) => request,
        Err(message) => {
            eprintln!("{message}");
            return 1;
        }
    };
    solve_and_print(&request, config, has_flag(args, "--table"))
}

/// `tiller fill <roster.json|roster.csv> [rows] [target_trim] [--table]`
fn handle_fill(args: &[String], config: &AppConfig) -> i32 {
    const FILL_USAGE: &str = "usage: tiller fill <roster.json|roster.csv> [rows] [target_trim] [--table]";
    let Some(path) = args.get(2) else {
        eprintln!("{FILL_USAGE}");
        return 2;
    };
    let positional: Vec<&String> = args[3..].iter().filter(|arg| !arg.starts_with("--")).collect();
    let parsed = parse_arg(positional.first().copied(), "rows", config.lineup.default_rows)
        .and_then(|rows| {
            parse_arg(positional.get(1).copied(), "target_trim", 0.0).map(|trim| (rows, trim))
        });
    let (rows, target_trim) = match parsed {
        Ok(values) => values,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{FILL_USAGE}");
            return 2;
        }
    };
    let participants = match load_roster(path) {
        Ok(participants) => participants,
        Err(err) => {
            eprintln!("roster load failed: {err}");
            return 1;
        }
    };

    let request = LineupRequest {
        rows: Some(i64::try_from(rows).unwrap_or(i64::MAX)),
        participants,
        target_trim,
        ..LineupRequest::default()
    };
    solve_and_print(&request, config, has_flag(args, "--table"))
}

/// `tiller layout [rows]`
fn handle_layout(args: &[String], config: &AppConfig) -> i32 {
    let rows = match parse_arg(args.get(2), "rows", config.lineup.default_rows) {
        Ok(rows) => rows,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: tiller layout [rows]");
            return 2;
        }
    };
    if rows > config.lineup.max_rows {
        eprintln!(
            "{}",
            LineupError::InvalidLayout {
                rows: i64::try_from(rows).unwrap_or(i64::MAX),
            }
        );
        return 1;
    }
    let layout = match SeatLayout::build(rows) {
        Ok(layout) => layout,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    println!("seat\tkind\trow");
    for seat in layout.seats() {
        let row = seat.row().map(|row| row.to_string()).unwrap_or_else(|| "-".to_string());
        println!("{seat}\t{}\t{row}", seat.kind().as_str());
    }
    0
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: tiller validate <roster.json|roster.csv>");
        return 2;
    };

    match validate_roster_file(path) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            if report.has_errors() {
                eprintln!(
                    "validation failed: {} error(s)",
                    report.count(ValidationSeverity::Error)
                );
                1
            } else {
                println!("validation passed: {path}");
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Requests(Vec<LineupRequest>),
    Wrapped { requests: Vec<LineupRequest> },
}

/// `tiller batch <requests.json>`; one outcome per request, in file order.
fn handle_batch(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: tiller batch <requests.json>");
        return 2;
    };
    let requests = match read_json::<BatchFile>(path) {
        Ok(BatchFile::Requests(requests)) | Ok(BatchFile::Wrapped { requests }) => requests,
        Err(message) => {
            eprintln!("{message}");
            return 1;
        }
    };

    let pool = WorkerPool::with_workers(config.parallel.workers);
    let outcomes: Vec<BatchOutcome> = solve_batch(&requests, &config.lineup.options(), &pool)
        .into_iter()
        .map(BatchOutcome::from)
        .collect();
    match serde_json::to_string_pretty(&outcomes) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize batch result: {err}");
            1
        }
    }
}

fn solve_and_print(request: &LineupRequest, config: &AppConfig, as_table: bool) -> i32 {
    let result = match optimize_lineup(request, &config.lineup.options()) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("lineup failed: {err}");
            return 1;
        }
    };

    if as_table {
        print_table(&result);
        return 0;
    }
    match serde_json::to_string_pretty(&result) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize lineup: {err}");
            1
        }
    }
}

fn print_table(result: &LineupResult) {
    println!("seat\tparticipant\tlocked");
    for assignment in &result.assignments {
        let occupant = match assignment.occupant {
            Occupant::Filled(id) => id.to_string(),
            Occupant::Unfilled => "-".to_string(),
        };
        println!("{}\t{occupant}\t{}", assignment.seat, assignment.locked);
    }
    let balance = &result.balance;
    println!(
        "left={:.1} right={:.1} trim={:.1} (target {:.1})",
        balance.left_kg, balance.right_kg, balance.trim_kg, balance.target_trim_kg
    );
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("failed to read '{path}': {err}"))?;
    serde_json::from_str(&raw).map_err(|err| format!("failed to parse '{path}': {err}"))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

/// Parse an optional positional argument. A missing argument takes `default`;
/// a malformed one is a usage error.
fn parse_arg<T: FromStr>(raw: Option<&String>, name: &str, default: T) -> Result<T, String> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|_| format!("invalid {name} '{value}'")),
    }
}
