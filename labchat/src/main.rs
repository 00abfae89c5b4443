//! labchat - a terminal chat client for the Engineer Growth Lab assistant.
//!
//! Architecture:
//! - `registry` owns the ordered conversation list and the selection
//! - `session` owns the message log and request lifecycle of the active
//!   conversation
//! - `app` ties the two together and rebuilds the session whenever the
//!   selection or model changes
//! - `client` talks to the assistant service's `POST /chat`
//! - `cli` is a thin front end over `app`

mod app;
mod cli;
mod client;
mod logging;
mod models;
mod registry;
mod session;

use anyhow::Result;
use clap::Parser;

use cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_json);
    execute(cli).await
}
