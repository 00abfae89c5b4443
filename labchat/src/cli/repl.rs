//! Interactive line-oriented chat loop.
//!
//! Plain lines are sent to the assistant; lines starting with `/` are
//! commands that drive the conversation list and model selection. A
//! leading `//` sends the rest of the line starting with a single `/`.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{ChatApp, SendOutcome};
use crate::models::{ChatModel, FeedbackAction};
use crate::session::{SendRejected, SessionState};

use super::render;

const HELP: &str = "\
Commands:
  /new                      Start a new conversation
  /list                     List conversations
  /select <ref>             Switch to a conversation (number or id prefix)
  /rename <ref> <name>      Rename a conversation
  /model [<id>]             Show or change the model
  /models                   List available models
  /history                  Show the current conversation
  /feedback <action> [<n>]  export, import, approve or reject a reply
  /help                     Show this help
  /quit                     Exit
Anything else is sent as a message; start it with // to send a leading /.";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    New,
    List,
    Select(String),
    Rename { reference: String, name: String },
    ShowModel,
    SetModel(String),
    Models,
    History,
    Feedback { action: String, position: Option<String> },
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Send(line.trim_end_matches(['\r', '\n']).to_string());
        };
        if rest.starts_with('/') {
            return Self::Send(rest.to_string());
        }

        let (command, args) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(c, a)| (c, a.trim()));

        match command {
            "new" => Self::New,
            "list" | "ls" => Self::List,
            "select" | "open" if !args.is_empty() => Self::Select(args.to_string()),
            "rename" => match args.split_once(char::is_whitespace) {
                Some((reference, name)) => Self::Rename {
                    reference: reference.to_string(),
                    name: name.trim().to_string(),
                },
                None => Self::Unknown(trimmed.to_string()),
            },
            "model" if args.is_empty() => Self::ShowModel,
            "model" => Self::SetModel(args.to_string()),
            "models" => Self::Models,
            "history" => Self::History,
            "feedback" if !args.is_empty() => {
                let mut parts = args.split_whitespace();
                let action = parts.next().unwrap_or_default().to_string();
                Self::Feedback {
                    action,
                    position: parts.next().map(str::to_string),
                }
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

/// Run the loop until `/quit` or end of input.
pub async fn run(mut app: ChatApp) -> Result<()> {
    println!("Engineer Growth Lab chat ({}). Type /help for commands.", app.model());
    if app.registry().is_empty() {
        println!("Use /new to start a conversation.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(&app)?;
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            command => {
                let output = handle(&mut app, command).await;
                if !output.is_empty() {
                    println!("{output}");
                }
            }
        }
    }

    Ok(())
}

fn prompt(app: &ChatApp) -> Result<()> {
    let name = match (app.state(), app.registry().active()) {
        (SessionState::Idle, _) | (_, None) => "no conversation",
        (_, Some(conversation)) => conversation.name.as_str(),
    };
    print!("{name}> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Apply one command and return the text to show.
pub async fn handle(app: &mut ChatApp, command: ReplCommand) -> String {
    match command {
        ReplCommand::Send(text) => send(app, text).await,
        ReplCommand::New => {
            app.create_conversation();
            current_history(app)
        }
        ReplCommand::List => {
            render::conversations(app.registry().conversations(), app.registry().active_id())
        }
        ReplCommand::Select(reference) => {
            let id = match app.registry().resolve(&reference) {
                Ok(id) => id.to_string(),
                Err(e) => return e.to_string(),
            };
            match app.select_conversation(&id) {
                Ok(()) => current_history(app),
                Err(e) => e.to_string(),
            }
        }
        ReplCommand::Rename { reference, name } => {
            let id = match app.registry().resolve(&reference) {
                Ok(id) => id.to_string(),
                Err(e) => return e.to_string(),
            };
            if app.rename_conversation(&id, &name) {
                format!("Renamed to \"{name}\"")
            } else {
                String::new()
            }
        }
        ReplCommand::ShowModel => format!("{} ({})", app.model(), app.model().label()),
        ReplCommand::SetModel(id) => match id.parse::<ChatModel>() {
            Ok(model) => {
                app.set_model(model);
                if app.session().is_some() {
                    current_history(app)
                } else {
                    format!("Model set to {model}")
                }
            }
            Err(e) => e.to_string(),
        },
        ReplCommand::Models => render::models(app.model()),
        ReplCommand::History => current_history(app),
        ReplCommand::Feedback { action, position } => feedback(app, &action, position.as_deref()),
        ReplCommand::Help => HELP.to_string(),
        ReplCommand::Unknown(line) => format!("Unknown command: {line} (try /help)"),
        ReplCommand::Quit | ReplCommand::Empty => String::new(),
    }
}

async fn send(app: &mut ChatApp, text: String) -> String {
    if let Some(session) = app.session_mut() {
        session.set_input(text);
    } else {
        return "Select or create a conversation first (/new).".to_string();
    }

    println!("Thinking...");
    match app.send_input().await {
        SendOutcome::Replied(reply) => {
            let position = app.session().map_or(0, |s| s.messages().len());
            render::message(position, &reply)
        }
        // Blank input and busy sessions are refused silently.
        SendOutcome::Ignored(SendRejected::NoConversation) => {
            "Select or create a conversation first (/new).".to_string()
        }
        SendOutcome::Ignored(_) | SendOutcome::Discarded => String::new(),
    }
}

fn current_history(app: &ChatApp) -> String {
    app.session().map_or_else(
        || "Select or create a conversation first (/new).".to_string(),
        |s| format!("-- {} --\n{}", s.model().label(), render::history(s.messages())),
    )
}

fn feedback(app: &ChatApp, action: &str, position: Option<&str>) -> String {
    let Some(action) = FeedbackAction::parse(action) else {
        return format!("Unknown feedback action: {action}");
    };
    let Some(session) = app.session() else {
        return "Select or create a conversation first (/new).".to_string();
    };

    let target = match position {
        Some(p) => p
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| session.messages().get(i)),
        None => session.messages().iter().rev().find(|m| m.is_assistant()),
    };

    match target {
        Some(message) if session.feedback(&message.id, action) => format!("Noted: {action}"),
        _ => "That message is not an assistant reply.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::testing::ScriptedClient;

    fn app(client: ScriptedClient) -> ChatApp {
        ChatApp::new(Arc::new(client), ChatModel::DeepseekR1)
    }

    #[test]
    fn parse_plain_text_is_send() {
        assert_eq!(
            ReplCommand::parse("  hello there"),
            ReplCommand::Send("  hello there".to_string())
        );
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
    }

    #[test]
    fn parse_double_slash_sends_literal_slash() {
        assert_eq!(
            ReplCommand::parse("//help me with regex"),
            ReplCommand::Send("/help me with regex".to_string())
        );
        assert_eq!(ReplCommand::parse("//"), ReplCommand::Send("/".to_string()));
    }

    #[test]
    fn parse_commands() {
        assert_eq!(ReplCommand::parse("/new"), ReplCommand::New);
        assert_eq!(ReplCommand::parse("/select 2"), ReplCommand::Select("2".to_string()));
        assert_eq!(
            ReplCommand::parse("/rename 1 Design  review"),
            ReplCommand::Rename {
                reference: "1".to_string(),
                name: "Design  review".to_string(),
            }
        );
        assert_eq!(ReplCommand::parse("/model"), ReplCommand::ShowModel);
        assert_eq!(
            ReplCommand::parse("/model haiku"),
            ReplCommand::SetModel("haiku".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/feedback up 3"),
            ReplCommand::Feedback {
                action: "up".to_string(),
                position: Some("3".to_string()),
            }
        );
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert!(matches!(ReplCommand::parse("/rename 1"), ReplCommand::Unknown(_)));
        assert!(matches!(ReplCommand::parse("/select"), ReplCommand::Unknown(_)));
    }

    #[tokio::test]
    async fn send_without_conversation_prompts_for_new() {
        let mut app = app(ScriptedClient::new());
        let out = handle(&mut app, ReplCommand::Send("Hello".to_string())).await;
        assert!(out.contains("/new"));
    }

    #[tokio::test]
    async fn conversation_flow() {
        let mut app = app(ScriptedClient::new().reply("Hi there"));

        let out = handle(&mut app, ReplCommand::New).await;
        assert!(out.contains("deepseek-r1:1.5b"));

        let out = handle(&mut app, ReplCommand::Send("Hello".to_string())).await;
        assert!(out.starts_with("[3]"));
        assert!(out.contains("Hi there"));

        let out = handle(
            &mut app,
            ReplCommand::Rename {
                reference: "1".to_string(),
                name: "Greetings".to_string(),
            },
        )
        .await;
        assert_eq!(out, "Renamed to \"Greetings\"");
        assert_eq!(app.session().unwrap().messages().len(), 3);

        let out = handle(
            &mut app,
            ReplCommand::Feedback {
                action: "approve".to_string(),
                position: None,
            },
        )
        .await;
        assert_eq!(out, "Noted: approve");

        let out = handle(
            &mut app,
            ReplCommand::Feedback {
                action: "approve".to_string(),
                position: Some("2".to_string()),
            },
        )
        .await;
        assert_eq!(out, "That message is not an assistant reply.");
    }

    #[tokio::test]
    async fn model_switch_restarts_conversation() {
        let mut app = app(ScriptedClient::new());
        handle(&mut app, ReplCommand::New).await;

        let out = handle(&mut app, ReplCommand::SetModel("haiku".to_string())).await;

        assert!(out.contains("claude-3-haiku"));
        assert_eq!(app.model(), ChatModel::Claude3Haiku);
        assert_eq!(app.session().unwrap().messages().len(), 1);

        let out = handle(&mut app, ReplCommand::SetModel("gpt-4".to_string())).await;
        assert!(out.contains("unsupported model"));
    }

    #[tokio::test]
    async fn select_by_position() {
        let mut app = app(ScriptedClient::new());
        let first = app.create_conversation();
        app.create_conversation();

        handle(&mut app, ReplCommand::Select("1".to_string())).await;
        assert_eq!(app.registry().active_id(), Some(first.id.as_str()));

        let out = handle(&mut app, ReplCommand::Select("9".to_string())).await;
        assert!(out.contains("no conversation matches"));
        assert_eq!(app.registry().active_id(), Some(first.id.as_str()));
    }
}
