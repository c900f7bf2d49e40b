use std::path::PathBuf;

use clap::Parser;

/// pocmap: fingerprint targets, resolve matching PoC templates and scan them
#[derive(Parser, Debug, Default)]
#[command(name = "pocmap", version, about = "Fingerprint-driven PoC scan orchestrator")]
pub struct Args {
    /// 1 = clean a .txt target list and fingerprint it first, 2 = use an existing .xlsx table.
    /// Prompted for when omitted.
    #[arg(short = 'm', long = "mode", value_name = "1|2", value_parser = clap::value_parser!(u8).range(1..=2))]
    pub mode: Option<u8>,

    /// Input file name, with or without its extension. Prompted for when omitted.
    #[arg(short = 'i', long = "input", value_name = "NAME")]
    pub input: Option<String>,

    /// Configuration file (default: ./pocmap.toml if present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report destination; format follows the extension (.xlsx, .csv, .json)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of checks executing at once
    #[arg(long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Skip the online advisory search and resolve from local definitions only
    #[arg(long = "offline")]
    pub offline: bool,

    /// Increase verbosity level (use -v, -vv or -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
