//! Dragon boat lineup optimizer.
//!
//! [optimizer::optimize_lineup] is the entry point; [server] and [cli] wrap it.

pub mod boat;
pub mod cli;
pub mod config;
pub mod data;
pub mod optimizer;
pub mod parallel;
pub mod server;
