use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use breakpoint::presets::{PresetBackend, PresetStore};
use breakpoint::session::{
    encode_breakpoints, is_frame_height_preset, try_decode_breakpoints, AppearanceMode,
    SessionState, FRAME_HEIGHT_PRESETS, MAX_FRAME_HEIGHT, MIN_FRAME_HEIGHT,
};
use breakpoint::{util, web, AppStateStore, Config, ContrastScanner, Database, DocumentSnapshot, MemoryBackend};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Responsive multi-viewport preview tools", long_about = None)]
struct Cli {
    /// Data directory (defaults to ~/.breakpoint)
    #[arg(long, global = true, env = "BREAKPOINT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the content-rewriting proxy
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Build or inspect a shareable locator
    Link {
        #[command(subcommand)]
        action: LinkCommand,
    },
    /// Manage saved presets
    Presets {
        #[command(subcommand)]
        action: PresetCommand,
    },
    /// Check text contrast in a captured document snapshot (JSON)
    Scan {
        /// Snapshot file; bare names are looked up in the snapshots directory
        snapshot: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum LinkCommand {
    Encode {
        /// Target page
        #[arg(long)]
        url: Option<String>,
        /// Comma separated widths, e.g. 360px,768px,48em
        #[arg(long)]
        widths: Option<String>,
        /// Frame height in pixels
        #[arg(long)]
        height: Option<u32>,
        /// light, dark or system
        #[arg(long)]
        theme: Option<String>,
    },
    Decode {
        locator: String,
    },
}

#[derive(Subcommand, Debug)]
enum PresetCommand {
    List,
    Save {
        name: String,
        #[arg(long)]
        widths: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Print the locator for a preset
    Load {
        name: String,
    },
    Delete {
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());
    init_logging(matches!(cli.command, Command::Serve { .. }))?;

    let config = Config::load();

    match cli.command {
        Command::Serve { host, port } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            web::run_server(server).await
        }
        Command::Link { action } => run_link(action),
        Command::Presets { action } => run_presets(action),
        Command::Scan { snapshot } => run_scan(&config, snapshot),
    }
}

/// Log to ~/.breakpoint/logs/breakpoint.log; `serve` also logs to stderr.
fn init_logging(to_stderr: bool) -> Result<()> {
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let file_layer = fmt::layer().with_writer(log_file).with_ansi(false);
    let stderr_layer = to_stderr.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn run_link(action: LinkCommand) -> Result<()> {
    match action {
        LinkCommand::Encode {
            url,
            widths,
            height,
            theme,
        } => {
            let mut state = SessionState::default();
            if let Some(url) = url {
                state.load_url(&url)?;
            }
            if let Some(widths) = widths {
                let breakpoints = try_decode_breakpoints(&widths)
                    .with_context(|| format!("invalid widths: {widths}"))?;
                state.replace_breakpoints(breakpoints);
            }
            if let Some(height) = height {
                if !(MIN_FRAME_HEIGHT..=MAX_FRAME_HEIGHT).contains(&height) {
                    eprintln!("height clamped to {MIN_FRAME_HEIGHT}..={MAX_FRAME_HEIGHT}");
                }
                state.set_frame_height(height);
                if !is_frame_height_preset(state.frame_height) {
                    tracing::debug!(
                        height = state.frame_height,
                        presets = ?FRAME_HEIGHT_PRESETS,
                        "Frame height is not one of the presets"
                    );
                }
            }
            if let Some(theme) = theme {
                state.appearance = AppearanceMode::parse(&theme)
                    .with_context(|| format!("unknown theme: {theme}"))?;
            }
            println!("{}", state.locator());
        }
        LinkCommand::Decode { locator } => {
            let state = SessionState::from_locator(&locator);
            let widths: Vec<String> = state.breakpoints.iter().map(|b| b.label()).collect();
            let json = serde_json::json!({
                "url": state.target_url,
                "widths": widths,
                "height": state.frame_height,
                "heightPreset": is_frame_height_preset(state.frame_height),
                "theme": state.appearance.as_str(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

/// Sqlite-backed storage, or memory when the database cannot be opened.
fn open_backend() -> Arc<dyn PresetBackend> {
    match Database::open_default() {
        Ok(db) => Arc::new(AppStateStore::new(db.connection())),
        Err(e) => {
            tracing::warn!(error = %e, "Database unavailable, presets will not be saved");
            eprintln!("warning: database unavailable ({e}); changes will not persist");
            Arc::new(MemoryBackend::new())
        }
    }
}

fn run_presets(action: PresetCommand) -> Result<()> {
    let mut store = PresetStore::load_all(open_backend());
    match action {
        PresetCommand::List => {
            println!("{}", serde_json::to_string_pretty(&store.list())?);
        }
        PresetCommand::Save { name, widths, url } => {
            let breakpoints = try_decode_breakpoints(&widths)
                .with_context(|| format!("invalid widths: {widths}"))?;
            if let Some(url) = &url {
                if !breakpoint::session::is_http_url(url) {
                    bail!("not an http(s) url: {url}");
                }
            }
            let outcome = store.save(&name, &breakpoints, url.as_deref())?;
            println!("{name}: {outcome:?} ({})", encode_breakpoints(&breakpoints));
        }
        PresetCommand::Load { name } => {
            let patch = store.load(&name, None)?;
            let mut state = SessionState::default();
            state.replace_breakpoints(patch.breakpoints);
            state.target_url = patch.adopt_url;
            println!("{}", state.locator());
        }
        PresetCommand::Delete { name } => {
            if !store.delete(&name) {
                bail!("no preset named {name}");
            }
            println!("deleted {name}");
        }
    }
    Ok(())
}

fn run_scan(config: &Config, snapshot: PathBuf) -> Result<()> {
    let path = if snapshot.exists() || snapshot.components().count() > 1 {
        snapshot
    } else {
        util::snapshots_dir().join(snapshot)
    };
    let contents =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let doc: DocumentSnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;

    let report = ContrastScanner::new(config.scan).scan_document(&doc);
    tracing::info!(
        path = %path.display(),
        scanned = report.scanned,
        failed = report.failed,
        "Scanned snapshot"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
