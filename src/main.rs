use clap::{Parser, Subcommand};
use obspad::action::catalog::{self, ActionParams};
use obspad::dispatch::Dispatcher;
use obspad::keys::KeyId;
use obspad::remote::obs::{Endpoint, ObsRemote};
use obspad::session::RemoteSession;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const CHANNEL_CAPACITY: usize = 64;

/// obspad — headless macropad-to-OBS control daemon
#[derive(Parser)]
#[command(name = "obspad", version, about)]
struct Cli {
    /// Path to the bindings file (TOML).
    #[arg(short, long, default_value = "obspad.toml")]
    config: PathBuf,

    /// Enable JSON log output (for journald).
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the daemon (default).
    Run,

    /// Validate the bindings file and exit.
    Check,

    /// Print the current bindings.
    Show,

    /// Print the available action kinds and their parameters.
    Actions,

    /// Bind an action to a key, e.g. `bind key7 toggle_filter --source Webcam --filter Blur`.
    Bind {
        /// Key label (`enc1`..`enc3`, `key1`..`key15`).
        key: String,
        /// Action kind tag (see `actions`).
        action: String,
        #[arg(long)]
        scene: Option<String>,
        #[arg(long)]
        command: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        filter: Option<String>,
    },

    /// Reset a key to unbound.
    Unbind { key: String },

    /// Query available input names from the backend (best effort).
    ListInputs,

    /// Query filter names on a source (best effort).
    ListFilters { source: String },
}

fn new_session() -> Arc<RemoteSession> {
    Arc::new(RemoteSession::new(Arc::new(ObsRemote::new(
        Endpoint::from_env(),
    ))))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Init tracing.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("obspad=info"));

    if cli.json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_daemon(cli.config).await,
        Command::Check => {
            let store = obspad::config::load(&cli.config)?;
            let bound = store
                .all()
                .iter()
                .filter(|b| b.action != obspad::action::ActionKind::Unbound)
                .count();
            println!("config OK: {bound} of {} keys bound", store.all().len());
            Ok(())
        }
        Command::Show => {
            let store = obspad::config::load_or_default(&cli.config);
            for binding in store.all() {
                println!("{:<8} {}", binding.key.to_string(), binding.action);
            }
            Ok(())
        }
        Command::Actions => {
            for template in catalog::TEMPLATES {
                if template.params.is_empty() {
                    println!("{:<18} {}", template.kind, template.label);
                } else {
                    println!(
                        "{:<18} {} (requires: {})",
                        template.kind,
                        template.label,
                        template.params.join(", ")
                    );
                }
            }
            Ok(())
        }
        Command::Bind { key, action, scene, command, source, filter } => {
            let key: KeyId = key.parse()?;
            let store = Arc::new(obspad::config::load_or_default(&cli.config));
            let dispatcher = Dispatcher::new(store, new_session(), Some(cli.config));
            let params = ActionParams { scene, command, source, filter };
            let bound = dispatcher.assign(key, &action, params)?;
            println!("{key} bound to {bound}");
            Ok(())
        }
        Command::Unbind { key } => {
            let key: KeyId = key.parse()?;
            let store = Arc::new(obspad::config::load_or_default(&cli.config));
            let dispatcher = Dispatcher::new(store, new_session(), Some(cli.config));
            dispatcher.unassign(key);
            println!("{key} unbound");
            Ok(())
        }
        Command::ListInputs => {
            for name in new_session().list_inputs().await {
                println!("{name}");
            }
            Ok(())
        }
        Command::ListFilters { source } => {
            for name in new_session().list_filters(&source).await {
                println!("{name}");
            }
            Ok(())
        }
    }
}

async fn run_daemon(config_path: PathBuf) -> anyhow::Result<()> {
    info!("obspad v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(obspad::config::load_or_default(&config_path));
    let bound = store
        .all()
        .iter()
        .filter(|b| b.action != obspad::action::ActionKind::Unbound)
        .count();
    info!("loaded bindings: {bound} keys bound");

    let session = new_session();

    // Best effort: the backend is often not up yet. Triggers reconnect
    // lazily either way.
    if let Err(e) = session.connect().await {
        warn!("backend not reachable yet: {e}");
    }

    let dispatcher = Arc::new(Dispatcher::new(store, session, Some(config_path)));
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();

    let bridge_handle = tokio::spawn(obspad::bridge::read_stdin(tx, cancel.clone()));

    dispatcher.run(rx, cancel).await;

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), bridge_handle).await;
    info!("obspad stopped");
    Ok(())
}
