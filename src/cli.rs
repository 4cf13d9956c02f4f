use clap::Parser;

use crate::demo::DEFAULT_SEED;

#[derive(Parser, Debug)]
#[command(
    name = "termexam",
    version,
    about = "Terminal-based timed mock exam for math entrance-test preparation"
)]
pub struct Cli {
    /// Question bank file (.csv or .json) [default: built-in bank]
    pub bank: Option<String>,

    /// Seed for the built-in bank
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Student name shown on exports
    #[arg(long, default_value = "student")]
    pub name: String,

    /// Classroom shown on exports
    #[arg(long, default_value = "12A")]
    pub classroom: String,

    /// Write the loaded bank as CSV to this path and exit
    #[arg(long, value_name = "path")]
    pub export_bank: Option<String>,

    /// Directory for result and report exports
    #[arg(long, value_name = "dir", default_value = ".")]
    pub out_dir: String,
}
