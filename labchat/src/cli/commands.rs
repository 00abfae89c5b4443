//! CLI command execution.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::app::{ChatApp, SendOutcome};
use crate::client::{AssistantClient, ClientConfig, HttpAssistantClient};
use crate::models::ChatModel;

use super::args::{Cli, Commands};
use super::{render, repl};

impl From<&Cli> for ClientConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            endpoint: cli.endpoint.clone(),
            timeout: Duration::from_secs(cli.timeout_secs),
        }
    }
}

// === Command Execution ===

pub async fn execute(cli: Cli) -> Result<()> {
    let config = ClientConfig::from(&cli);

    match cli.command {
        Some(Commands::Models) => {
            list_models(cli.model);
            Ok(())
        }
        Some(Commands::Ask { message }) => ask(&config, cli.model, &message.join(" ")).await,
        Some(Commands::Chat) | None => {
            let client = Arc::new(HttpAssistantClient::new(&config)?);
            tracing::info!(url = %client.chat_url(), model = %cli.model, "starting chat");
            repl::run(ChatApp::new(client, cli.model)).await
        }
    }
}

fn list_models(current: ChatModel) {
    println!("{}", render::models(current));
}

/// One-shot exchange. Exits non-zero when the service did not answer.
async fn ask(config: &ClientConfig, model: ChatModel, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message is required for ask command");
    }

    let client = Arc::new(HttpAssistantClient::new(config)?);
    let mut app = ChatApp::new(client.clone(), model);
    app.create_conversation();

    let exchange = match app.begin_send(message) {
        Ok(exchange) => exchange,
        Err(reason) => bail!("Message was not sent: {reason:?}"),
    };

    let outcome = client.chat(&exchange.request).await;
    let failed = outcome.is_err();

    match app.complete(exchange, outcome) {
        SendOutcome::Replied(reply) => println!("{}", reply.content),
        other => bail!("No reply recorded: {other:?}"),
    }

    if failed {
        bail!("Assistant service at {} did not answer", config.endpoint);
    }
    Ok(())
}
