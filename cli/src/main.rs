mod channel;
mod config;
mod runtime;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use client::persist::{FileStore, StoreError};
use client::render::DEFAULT_CARD_TEMPLATE;
use client::state::session::Role;
use client::{AdminAction, AdminClient, PlayerAction, PlayerClient};

use crate::config::{ClientConfig, ConfigError, DEFAULT_STATE_DIR, DEFAULT_URL, DEFAULT_WIRE};
use crate::terminal::{AdminCommands, PlayerCommands};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("session store failed: {0}")]
    Store(#[from] StoreError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "asesino", about = "Terminal client for the Asesino card game")]
struct Cli {
    #[arg(long, env = "ASESINO_URL", default_value = DEFAULT_URL, global = true)]
    url: String,

    #[arg(long, env = "ASESINO_STATE_DIR", default_value = DEFAULT_STATE_DIR, global = true)]
    state_dir: PathBuf,

    #[arg(
        long,
        env = "ASESINO_WIRE",
        default_value = DEFAULT_WIRE,
        global = true,
        help = "json or proto"
    )]
    wire: String,

    #[arg(
        long,
        env = "ASESINO_CARD_TEMPLATE",
        default_value = DEFAULT_CARD_TEMPLATE,
        global = true
    )]
    card_template: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join the queue and wait for a card.
    Player {
        #[arg(long)]
        name: Option<String>,
    },
    /// Log in, watch the roster, and start the game.
    Admin {
        #[arg(long, env = "ASESINO_ADMIN_PASSWORD")]
        password: Option<String>,

        #[arg(long, help = "Also play under this name")]
        play_as: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    if let Some(e) = dotenv.err().filter(|e| !e.not_found()) {
        tracing::warn!(error = %e, "failed to load .env");
    }

    let cli = Cli::parse();
    let config = ClientConfig::new(cli.url, cli.state_dir, &cli.wire, cli.card_template)?;
    tracing::info!(url = %config.url, wire = ?config.wire, "starting");

    match cli.command {
        Command::Player { name } => run_player(&config, name).await,
        Command::Admin { password, play_as } => run_admin(&config, password, play_as).await,
    }
}

async fn run_player(config: &ClientConfig, name: Option<String>) -> Result<(), CliError> {
    let store = FileStore::open(config.store_path(Role::Player))?;
    tracing::info!(path = %store.path().display(), "session store opened");
    let client = PlayerClient::new(store, config.client_options());
    let initial = name.map(PlayerAction::SubmitName).into_iter().collect();

    let channel = channel::spawn_channel(config.url.clone(), config.wire, config.reconnect);
    runtime::run(client, PlayerCommands, channel, initial, config.self_check).await
}

async fn run_admin(
    config: &ClientConfig,
    password: Option<String>,
    play_as: Option<String>,
) -> Result<(), CliError> {
    let store = FileStore::open(config.store_path(Role::Admin))?;
    tracing::info!(path = %store.path().display(), "session store opened");
    let client = AdminClient::new(store, config.client_options());

    let mut initial = Vec::new();
    if let Some(name) = play_as {
        initial.push(AdminAction::PlayAs(name));
    }
    if let Some(password) = password {
        initial.push(AdminAction::Login { password });
    }

    let channel = channel::spawn_channel(config.url.clone(), config.wire, config.reconnect);
    runtime::run(client, AdminCommands::default(), channel, initial, config.self_check).await
}
