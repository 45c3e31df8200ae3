//! CLI entry point for the pyramid route solver.
//!
//! Usage:
//!   pyramid-solver solve <board.json> [options]
//!   pyramid-solver solve --stdin [options]
//!
//! Reads a board config (start tile, blocked tiles, collectibles) as JSON,
//! runs the search, and prints a JSON result with the pipe-delimited route
//! notation and total MP. Exit codes: 0 route found, 1 no feasible route,
//! 2 malformed board or input.

mod board;
mod error;
mod graph;
mod solver;
mod tile;
mod trace;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use serde::{Deserialize, Serialize};

use board::{Board, BoardConfig};
use solver::{solve, SolverConfig, SolverResult};

#[derive(Parser)]
#[command(name = "pyramid-solver")]
#[command(about = "Minimum-MP route solver for the pyramid puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a board and print the optimal route
    Solve {
        /// Path to board JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read board from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Hard ceiling on distinct search states
        #[arg(long, default_value = "1000000")]
        max_states: usize,
    },
}

/// JSON result printed on stdout.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    feasible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_mp: Option<u32>,
    states_expanded: usize,
    time_elapsed_ms: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            max_states,
        } => run_solve(file, stdin, max_states),
    }
}

fn run_solve(file: Option<PathBuf>, stdin: bool, max_states: usize) -> ExitCode {
    let json_content = if stdin {
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            eprintln!("Error reading from stdin: {}", e);
            return ExitCode::from(2);
        }
        buffer
    } else if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file {:?}: {}", path, e);
                return ExitCode::from(2);
            }
        }
    } else {
        eprintln!("Error: must provide either a file path or --stdin");
        return ExitCode::from(2);
    };

    let config: BoardConfig = match serde_json::from_str(&json_content) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error parsing board JSON: {}", e);
            return ExitCode::from(2);
        }
    };

    let board = match Board::new(config) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Malformed board: {}", e);
            return ExitCode::from(2);
        }
    };

    let solver_config = SolverConfig { max_states };
    let result = match solve(&board, &solver_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Solver error: {}", e);
            return ExitCode::from(2);
        }
    };

    match &result.route {
        Some(route) => info!("route found: {} MP", route.total_mp),
        None => info!("no feasible route"),
    }

    let output = format_result(&result);
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            return ExitCode::from(2);
        }
    }

    if result.route.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn format_result(result: &SolverResult) -> SolveOutput {
    SolveOutput {
        feasible: result.route.is_some(),
        path: result.route.as_ref().map(|r| r.notation()),
        total_mp: result.route.as_ref().map(|r| r.total_mp),
        states_expanded: result.states_expanded,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape() {
        let output = SolveOutput {
            feasible: true,
            path: Some("E5|D3:key|C2|B1|A1".to_string()),
            total_mp: Some(9),
            states_expanded: 42,
            time_elapsed_ms: 0,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"totalMp\":9"));
        assert!(json.contains("\"statesExpanded\":42"));

        let back: SolveOutput = serde_json::from_str(&json).unwrap();
        assert!(back.feasible);
        assert_eq!(back.path.as_deref(), Some("E5|D3:key|C2|B1|A1"));
    }

    #[test]
    fn test_infeasible_output_omits_path() {
        let output = SolveOutput {
            feasible: false,
            path: None,
            total_mp: None,
            states_expanded: 7,
            time_elapsed_ms: 0,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("path"));
        assert!(!json.contains("totalMp"));
    }
}
