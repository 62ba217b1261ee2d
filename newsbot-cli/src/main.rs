//! newsbot-cli: ask the news skill server a question from the terminal
//!
//! Sends the same webhook payload the chat platform sends, then prints the
//! reply text.
//!
//! # Subcommands
//! - `ask <utterance> [--json]`: POST /api/searchNews
//! - `status`: show server health

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "newsbot-cli",
    version,
    about = "Ask the newsbot skill server for related news"
)]
struct Cli {
    /// newsbot HTTP server URL (overrides NEWSBOT_HTTP_URL env var)
    #[arg(long, env = "NEWSBOT_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ask a question the way a chat user would
    Ask {
        /// The user's utterance
        utterance: String,

        /// Print the raw reply envelope instead of its text
        #[arg(long)]
        json: bool,
    },

    /// Show newsbot server status
    Status,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest<'a> {
    pub user_request: UserRequest<'a>,
}

#[derive(Debug, Serialize)]
pub struct UserRequest<'a> {
    pub utterance: &'a str,
}

pub fn webhook_request(utterance: &str) -> WebhookRequest<'_> {
    WebhookRequest {
        user_request: UserRequest { utterance },
    }
}

#[derive(Debug, Deserialize)]
pub struct ReplyEnvelope {
    pub version: String,
    pub template: ReplyTemplate,
}

#[derive(Debug, Deserialize)]
pub struct ReplyTemplate {
    #[serde(default)]
    pub outputs: Vec<ReplyOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyOutput {
    pub simple_text: Option<SimpleText>,
}

#[derive(Debug, Deserialize)]
pub struct SimpleText {
    pub text: String,
}

/// Text of the first simpleText output, if any.
pub fn reply_text(envelope: &ReplyEnvelope) -> Option<&str> {
    envelope
        .template
        .outputs
        .iter()
        .find_map(|o| o.simple_text.as_ref())
        .map(|s| s.text.as_str())
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

/// POST the utterance to /api/searchNews and print the reply.
fn do_ask(server: &str, utterance: &str, json_output: bool) -> anyhow::Result<()> {
    // The server waits on three upstream providers per request
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()?;

    let url = format!("{}/api/searchNews", server);
    let resp = match client.post(&url).json(&webhook_request(utterance)).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("newsbot-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    let status = resp.status();
    let body = resp.text().unwrap_or_default();

    if json_output {
        println!("{}", body);
        if !status.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let envelope: ReplyEnvelope = match serde_json::from_str(&body) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("newsbot-cli: server returned {}: {} ({})", status, body, e);
            std::process::exit(1);
        }
    };

    let text = reply_text(&envelope).unwrap_or("");
    if status.is_success() {
        println!("{}", text);
    } else {
        eprintln!("newsbot-cli: server returned {}: {}", status, text);
        std::process::exit(1);
    }

    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/health", server);
    let resp = client.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("newsbot server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:        {}", body["version"].as_str().unwrap_or("?"));
            println!("PostgreSQL:     {}", body["postgresql"].as_str().unwrap_or("?"));
            println!("pgvector:       {}", body["pgvector"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            let status = r.status();
            eprintln!("newsbot-cli: server unhealthy (HTTP {})", status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("newsbot-cli: cannot reach {}: {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Ask { utterance, json } => do_ask(&server, &utterance, json),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("newsbot-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
