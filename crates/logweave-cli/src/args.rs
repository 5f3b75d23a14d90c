use crate::types::{ColorChoice, LogLevel, ViewMode};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logweave")]
#[command(about = "View log files with per-line format detection and foldable causal task trees", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Files to view; reads stdin when empty or `-`
    pub files: Vec<PathBuf>,

    #[arg(long, default_value = "auto")]
    pub view: ViewMode,

    /// Expand every expandable tree node
    #[arg(long)]
    pub expand_all: bool,

    /// Prefix flat lines with their resolved timestamp
    #[arg(long)]
    pub timestamps: bool,

    /// Prefix flat lines with their line number
    #[arg(long)]
    pub line_numbers: bool,

    #[arg(long)]
    pub color: Option<ColorChoice>,

    /// Config file; defaults to $LOGWEAVE_CONFIG, then the user config directory
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}
