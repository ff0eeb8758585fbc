//! Word Battle server binary.
//!
//! # Usage
//!
//! ```bash
//! # Serve on the default port with a word list
//! wordbattle-server --words words.txt
//!
//! # Shorter turns, verbose logging
//! WORDBATTLE_TURN_SECS=20 wordbattle-server --words words.txt --log-level debug
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wordbattle::prelude::*;

/// Word Battle game server
#[derive(Parser, Debug)]
#[command(name = "wordbattle-server")]
#[command(about = "Room-based, turn-taking word-grid game server")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, env = "WORDBATTLE_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Word list, one word per line
    #[arg(short, long, env = "WORDBATTLE_WORDS")]
    words: Option<String>,

    /// Seconds a player has to finish a turn
    #[arg(long, env = "WORDBATTLE_TURN_SECS", default_value = "40")]
    turn_secs: u64,

    /// Seconds a rejoin token stays valid after a disconnect
    #[arg(long, env = "WORDBATTLE_GRACE_SECS", default_value = "120")]
    grace_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WORDBATTLE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!(bind = %args.bind, "Word Battle server starting");

    let mut builder = WordBattleServer::builder()
        .bind(&args.bind)
        .session_config(SessionConfig {
            reconnect_grace_secs: args.grace_secs,
        })
        .room_config(RoomConfig {
            game: GameConfig {
                turn_time: Duration::from_secs(args.turn_secs.max(1)),
                ..GameConfig::default()
            },
            ..RoomConfig::default()
        });

    if let Some(path) = &args.words {
        let words = WordList::load(path)?;
        tracing::info!(path, words = words.len(), "word list loaded");
        builder = builder.dictionary(Arc::new(words));
    }

    let server = builder.build().await?;
    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
