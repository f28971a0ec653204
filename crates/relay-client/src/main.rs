//! Stream relay PC client — entry point.
//!
//! Runs on the gaming PC. Connects to the relay service, registers as the
//! PC client, and replays viewer commands as real input against the target
//! game window.
//!
//! # Usage
//!
//! ```text
//! relay-client [OPTIONS] [COMMAND]
//!
//! Commands:
//!   run             Connect to the relay service and process commands (default)
//!   calibrate       Interactively calibrate the window region
//!   self-test       Exercise arrow keys and clicks locally
//!   mouse-position  Print the pointer position until interrupted
//!   debug-clicks    Perform mapped clicks at fixed normalized points
//!
//! Options:
//!   --config <PATH>  Config file path [default: relay.toml]
//!   --server <URL>   Override the relay service URL
//! ```
//!
//! # Architecture overview
//!
//! ```text
//! relay service  (JSON events over WebSocket)
//!       ↕
//! relay-client   ← this process
//!   application/     dispatch, executor, calibration, self-test
//!   infrastructure/  network, enigo injection, TOML config
//!       ↕
//! OS input APIs  (synthetic key/mouse events into the game window)
//! ```
//!
//! The dispatch loop is strictly sequential: each command's
//! validate → execute → acknowledge pipeline completes before the next
//! command is read from the channel.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use relay_client::application::calibrate::{Calibrator, Decision, OperatorPrompt};
use relay_client::application::dispatch::CommandDispatcher;
use relay_client::application::execute::{ActionExecutor, InputInjector, SharedMapping};
use relay_client::application::self_test::run_self_test;
use relay_client::infrastructure::config::{RelayConfig, DEFAULT_CONFIG_PATH};
use relay_client::infrastructure::injection::EnigoInjector;
use relay_client::infrastructure::network::{NetworkEvent, ServerConnection};
use relay_core::{ClientEvent, ClickKind, NormalizedPoint, SampleLabel};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "relay-client", about = "Stream relay PC client", version)]
struct Cli {
    /// Config file path.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Relay service WebSocket URL; overrides the config file.
    #[arg(long, global = true, env = "RELAY_SERVER_URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the relay service and process viewer commands.
    Run,
    /// Interactively calibrate the window region from six pointer samples.
    Calibrate,
    /// Exercise arrow keys and clicks so the operator can verify injection.
    SelfTest,
    /// Print the pointer position every 100 ms until Ctrl-C.
    MousePosition,
    /// Perform mapped clicks at fixed normalized points to check the mapping.
    DebugClicks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = RelayConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    if let Some(url) = &cli.server {
        config.server.url = url.clone();
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_client(&config).await,
        Commands::Calibrate => run_calibration(&cli.config, config).await,
        Commands::SelfTest => {
            let (executor, _mapping, _injector) = build_executor(&config)?;
            let failures = run_self_test(&executor).await;
            anyhow::ensure!(failures == 0, "{failures} self-test step(s) failed");
            Ok(())
        }
        Commands::MousePosition => run_mouse_position().await,
        Commands::DebugClicks => run_debug_clicks(&config).await,
    }
}

/// Builds the real injector and an executor over the configured mapping.
fn build_executor(
    config: &RelayConfig,
) -> anyhow::Result<(ActionExecutor, SharedMapping, Arc<dyn InputInjector>)> {
    let injector: Arc<dyn InputInjector> =
        Arc::new(EnigoInjector::new().context("failed to open OS input system")?);
    let mapping: SharedMapping = Arc::new(RwLock::new(
        config.mapping().context("invalid window configuration")?,
    ));
    let executor = ActionExecutor::new(Arc::clone(&injector), Arc::clone(&mapping), config.tuning());
    Ok((executor, mapping, injector))
}

// ── run ───────────────────────────────────────────────────────────────────────

async fn run_client(config: &RelayConfig) -> anyhow::Result<()> {
    info!("stream relay PC client starting");
    info!(
        url = %config.server.url,
        window_x = config.window.x,
        window_y = config.window.y,
        window_width = config.window.width,
        window_height = config.window.height,
        "configuration loaded"
    );

    let (executor, _mapping, _injector) = build_executor(config)?;
    let dispatcher = CommandDispatcher::new(executor);

    // A connect failure is fatal: no reconnect loop, the operator restarts
    // deliberately.
    let (connection, mut events) = ServerConnection::connect(&config.server.url)
        .await
        .context("could not reach the relay service")?;

    info!("waiting for viewer commands (Ctrl-C to stop)");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            event = events.recv() => {
                match event {
                    Some(NetworkEvent::CommandReceived(command)) => {
                        // Full pipeline before the next command is read:
                        // validate, execute (with settle delays), acknowledge.
                        let ack = dispatcher.dispatch(command).await;
                        if let Err(e) = connection.send(&ClientEvent::CommandCompleted(ack)).await {
                            warn!(error = %e, "failed to send acknowledgment");
                        }
                    }
                    Some(NetworkEvent::Registered) => {
                        // Log-only lifecycle event; already logged by the transport.
                    }
                    Some(NetworkEvent::Disconnected) | None => {
                        warn!("connection to relay service lost, exiting");
                        break;
                    }
                }
            }
        }
    }

    info!("stream relay PC client stopped");
    Ok(())
}

// ── calibrate ─────────────────────────────────────────────────────────────────

/// Reads operator confirmations from stdin: Enter accepts, `q` cancels.
struct StdinPrompt;

impl StdinPrompt {
    fn ask(&self, text: &str) -> std::io::Result<Decision> {
        print!("{text} [Enter = accept, q = cancel] ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        if line.trim().eq_ignore_ascii_case("q") {
            Ok(Decision::Cancel)
        } else {
            Ok(Decision::Accept)
        }
    }
}

impl OperatorPrompt for StdinPrompt {
    fn confirm_sample(&mut self, label: SampleLabel) -> std::io::Result<Decision> {
        self.ask(&format!("Position the pointer on the {}.", label.instruction()))
    }

    fn confirm_commit(&mut self) -> std::io::Result<Decision> {
        self.ask("Did both verification clicks land correctly? Committing replaces the window region.")
    }
}

async fn run_calibration(config_path: &std::path::Path, mut config: RelayConfig) -> anyhow::Result<()> {
    use relay_client::application::calibrate::CalibrationOutcome;

    let (_executor, mapping, injector) = build_executor(&config)?;
    let calibrator = Calibrator::new(injector, mapping, config.tuning());

    match calibrator.run(&mut StdinPrompt).await? {
        CalibrationOutcome::Committed(new_mapping) => {
            config.apply_mapping(&new_mapping);
            config
                .save(config_path)
                .with_context(|| format!("failed to save config to {}", config_path.display()))?;
            info!(path = %config_path.display(), "calibration saved");
        }
        CalibrationOutcome::Cancelled => {
            info!("calibration cancelled, nothing changed");
        }
    }
    Ok(())
}

// ── mouse-position ────────────────────────────────────────────────────────────

async fn run_mouse_position() -> anyhow::Result<()> {
    let injector = EnigoInjector::new().context("failed to open OS input system")?;
    println!("Move the pointer to the window corners to find coordinates. Ctrl-C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                if let Ok((x, y)) = injector.pointer_position() {
                    print!("\rpointer: ({x}, {y})      ");
                    std::io::stdout().flush().ok();
                }
            }
        }
    }
    println!();
    Ok(())
}

// ── debug-clicks ──────────────────────────────────────────────────────────────

/// Normalized probe points: the four corners pulled slightly inward, plus
/// the center.
const DEBUG_POINTS: [(f64, f64); 5] = [
    (0.05, 0.05),
    (0.95, 0.05),
    (0.05, 0.95),
    (0.95, 0.95),
    (0.5, 0.5),
];

async fn run_debug_clicks(config: &RelayConfig) -> anyhow::Result<()> {
    let (executor, mapping, _injector) = build_executor(config)?;
    let current = *mapping.read().unwrap_or_else(|e| e.into_inner());

    info!("clicking five probe points in 3 seconds; watch the target window");
    tokio::time::sleep(Duration::from_secs(3)).await;

    for (rel_x, rel_y) in DEBUG_POINTS {
        let point = NormalizedPoint { rel_x, rel_y };
        let abs = current.map(point);
        info!(rel_x, rel_y, x = abs.x, y = abs.y, "probe click");
        if let Err(e) = executor.click_at(ClickKind::Left, point).await {
            warn!(error = %e, "probe click failed");
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    Ok(())
}
