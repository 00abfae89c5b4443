//! CLI argument parsing and the interactive front end.

mod args;
mod commands;
mod render;
mod repl;

pub use args::Cli;
pub use commands::execute;
