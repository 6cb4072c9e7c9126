//! Terminal front-end for the dApp chat proxy.
//!
//! Each stdin line is typed into the composer key by key. A line ending in
//! `\` is continued (Shift+Enter); any other line is submitted (Enter).

use std::sync::Arc;

use clap::Parser;
use dapp_chat::client::input::{Key, KeyPress};
use dapp_chat::client::session::DEFAULT_GREETING;
use dapp_chat::client::{ChatClient, ChatSession, HttpTransport, SendOutcome, WalletConnection};
use dapp_chat::protocol::{ChatContext, Role};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("transport setup failed: {0}")]
    Transport(#[from] dapp_chat::client::ClientError),
    #[error("stdin read failed: {0}")]
    Stdin(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chat", about = "Talk to the Web3 AI assistant through the chat proxy")]
struct Cli {
    #[arg(long, env = "CHAT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Connected wallet address sent as `context.from`.
    #[arg(long, env = "CHAT_WALLET_ADDRESS")]
    from: Option<String>,

    /// Active chain sent as `context.chain_ids`.
    #[arg(long, env = "CHAT_CHAIN_ID")]
    chain_id: Option<u64>,

    #[arg(long)]
    no_greeting: bool,
}

impl Cli {
    fn wallet(&self) -> WalletConnection {
        match &self.from {
            Some(address) => WalletConnection::connected(address.clone(), self.chain_id),
            None => WalletConnection { address: None, chain_id: self.chain_id },
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let transport = HttpTransport::new(&cli.base_url)?;
    let session = if cli.no_greeting { ChatSession::new() } else { ChatSession::with_greeting(DEFAULT_GREETING) };
    let client = ChatClient::new(session, Arc::new(transport));
    let context = ChatContext::from_wallet(&cli.wallet());

    let mut printed = 0;
    let mut banner: Option<String> = None;
    render(&client, &mut printed, &mut banner);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (text, continued) = match line.strip_suffix('\\') {
            Some(head) => (head, true),
            None => (line.as_str(), false),
        };
        for c in text.chars() {
            client.handle_key(KeyPress::plain(Key::Char(c)), &context).await;
        }
        if continued {
            client.handle_key(KeyPress::shifted(Key::Enter), &context).await;
            continue;
        }

        if let Some(SendOutcome::Failed { error_code }) = client.handle_key(KeyPress::plain(Key::Enter), &context).await {
            tracing::debug!(error_code, "turn failed");
        }
        render(&client, &mut printed, &mut banner);
    }
    Ok(())
}

/// Print transcript entries added since the last call, plus banner changes.
fn render(client: &ChatClient, printed: &mut usize, banner: &mut Option<String>) {
    let session = client.snapshot();
    for message in &session.messages()[*printed..] {
        let who = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("[{who}] {}", message.content);
    }
    *printed = session.messages().len();

    let current = session.config_error().map(str::to_string);
    if current != *banner {
        if let Some(text) = &current {
            eprintln!("!! {text}");
        }
        *banner = current;
    }
    client.with_session(ChatSession::take_scroll_request);
}
