//! Command shell entry point.

use linalg_vis_app::{Flow, Session};
use linalg_vis_core::BoardConfig;
use std::io::{self, BufRead};
use std::process::ExitCode;

fn load_config() -> Result<BoardConfig, String> {
    let mut args = std::env::args().skip(1);
    match (args.next().as_deref(), args.next()) {
        (None, _) => Ok(BoardConfig::default()),
        (Some("--config"), Some(path)) => BoardConfig::from_json_file(&path).map_err(|e| format!("{path}: {e}")),
        _ => Err("usage: linalg-vis [--config PATH]".to_string()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting linalg-vis");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = match Session::new(&config, io::stdout()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        };
        match session.run_line(&line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                log::warn!("Rejected \"{line}\": {e}");
                eprintln!("error: {e}");
            }
        }
    }
    ExitCode::SUCCESS
}
