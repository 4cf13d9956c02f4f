use std::path::{Path, PathBuf};

use clap::Parser;

use termexam::bank;
use termexam::cli::Cli;
use termexam::demo;
use termexam::model::TOTAL_QUESTIONS;
use termexam::report::StudentInfo;
use termexam::state::AppState;
use termexam::tui;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();

    // A broken external bank must not keep the student from practising.
    let bank = match cli.bank.as_deref() {
        Some(path) => match bank::load_bank(Path::new(path)) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Warning: {}; falling back to the built-in bank", e);
                demo::generate_demo_bank(cli.seed)
            }
        },
        None => demo::generate_demo_bank(cli.seed),
    };

    if let Some(ref path) = cli.export_bank {
        let bytes = bank::bank_csv_bytes(&bank)?;
        std::fs::write(path, bytes).map_err(|e| format!("Cannot write {}: {}", path, e))?;
        eprintln!("Bank exported to {}", path);
        return Ok(());
    }

    if bank.variants().is_empty() {
        return Err("The question bank is empty".to_string());
    }
    for (variant, len) in bank.incomplete_variants() {
        eprintln!(
            "Warning: variant {} has {} questions instead of {}",
            variant, len, TOTAL_QUESTIONS
        );
    }

    let student = StudentInfo {
        username: cli.name,
        classroom: cli.classroom,
    };
    let state = AppState::new(bank, student, PathBuf::from(cli.out_dir));
    tui::run_tui(state)
}
