//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::client::DEFAULT_ENDPOINT;
use crate::models::ChatModel;

/// labchat - chat with the Engineer Growth Lab assistant from a terminal
#[derive(Parser, Debug)]
#[command(name = "labchat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the assistant service
    #[arg(long, env = "LABCHAT_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Model to chat with (deepseek-r1:1.5b or claude-3-haiku)
    #[arg(
        short,
        long,
        env = "LABCHAT_MODEL",
        default_value = "deepseek-r1:1.5b",
        global = true
    )]
    pub model: ChatModel,

    /// Seconds to wait for a reply before giving up
    #[arg(
        long,
        env = "LABCHAT_TIMEOUT_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout_secs: u64,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Send one message in a fresh conversation and print the reply
    Ask {
        /// Message to send
        #[arg(trailing_var_arg = true, required = true)]
        message: Vec<String>,
    },

    /// List the models the assistant service understands
    Models,
}
