use anyhow::Result;
use armory_chat::net::Connection;
use armory_chat::replay::load_events;
use armory_chat::request::ChatIdentity;
use armory_chat::{ChatConfig, ChatSession, Envelope};
use async_trait::async_trait;
use chrono::Local;
use clap::Parser;
use log::{error, info};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// Replays a captured connection log through a chat session and prints every
// request the session sends and every event it emits as JSON lines.
//
// Usage:
//   cargo run -- --name Thrall --realm Draenor --replay capture.jsonl
//   RUST_LOG=debug cargo run -- -n Thrall -r Draenor --replay capture.jsonl

#[derive(Parser, Debug)]
#[command(name = "armory-chat", about = "Replay chat session traffic")]
struct Args {
    /// Character name to log into chat with.
    #[arg(short, long)]
    name: String,

    /// Realm of the character.
    #[arg(short, long)]
    realm: String,

    /// JSON-lines capture of connection events.
    #[arg(long)]
    replay: PathBuf,

    /// Keep-alive interval in seconds.
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u64).range(1..))]
    keep_alive_secs: u64,

    /// Seconds to wait for the logout confirmation after --close.
    #[arg(long, default_value_t = 30)]
    logout_timeout_secs: u64,

    /// Ask the service to filter mature language.
    #[arg(long)]
    mature_filter: bool,

    /// Send a logout once the capture has been replayed.
    #[arg(long)]
    close: bool,
}

/// Prints outbound requests instead of sending them.
struct StdoutConnection;

#[async_trait]
impl Connection for StdoutConnection {
    async fn send_request(&self, request: Envelope) -> Result<()> {
        println!("{}", json!({ "sent": request }));
        Ok(())
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{:<5}] [{}] - {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to build tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(replay(args)) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn replay(args: Args) -> Result<()> {
    let events = load_events(&args.replay).await?;
    info!("Loaded {} connection events from {}", events.len(), args.replay.display());

    let config = ChatConfig {
        keep_alive_interval: Duration::from_secs(args.keep_alive_secs),
        mature_filter: args.mature_filter,
        logout_timeout: Duration::from_secs(args.logout_timeout_secs),
    };
    let session = ChatSession::new(
        Arc::new(StdoutConnection),
        ChatIdentity::new(args.name, args.realm),
        config,
    );
    session.add_fn_handler(|_, event| {
        println!("{}", json!({ "emitted": event }));
    });

    let (tx, rx) = mpsc::channel(events.len().max(1));
    tokio::spawn(async move {
        for event in events {
            if tx.send(event).await.is_err() {
                break;
            }
        }
    });
    session.run(rx).await;

    if args.close && session.session_id().is_some() {
        session.close().await?;
    }
    info!("Replay finished, session is {}", session.state());
    Ok(())
}
