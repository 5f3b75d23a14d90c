mod args;
mod commands;
pub mod config;
pub mod logging;
pub mod presentation;
pub mod source;
pub mod types;

pub use args::Cli;
pub use commands::{ViewOptions, build_tree, render_flat, resolve_view, run};
