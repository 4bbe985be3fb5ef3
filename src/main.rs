//! Touchpad Skin - command-line decoder
//!
//! Loads a skin, optionally watches it for changes, and replays recorded
//! touch traces into controller state printed as JSON lines.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use touchpad_skin::config::{AppConfig, SkinWatcher};
use touchpad_skin::input::{ControllerSink, JsonLinesSink, TracingSink};
use touchpad_skin::paths::AppPaths;
use touchpad_skin::replay::Trace;
use touchpad_skin::skin::{SkinDirectory, SkinListing, SkinStore};

/// Touchpad Skin - decode touch input into N64 controller state
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skin to load (overrides the configuration)
    #[arg(short, long)]
    skin: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List installed skins
    #[arg(long)]
    list_skins: bool,

    /// Replay a CSV touch trace and report each frame
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// How replayed frames are reported
    #[arg(short, long, value_enum, default_value = "json")]
    output: Output,

    /// Reload the skin when its files change
    #[arg(short, long)]
    watch: bool,
}

/// Destination for replayed frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// One JSON object per frame on stdout
    Json,
    /// Controller state changes in the log
    Log,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting Touchpad Skin v{}...", env!("CARGO_PKG_VERSION"));

    let paths = AppPaths::detect();
    info!("Data directory: {}", paths.base_dir().display());
    let config_path = args.config.clone().unwrap_or_else(|| paths.config.clone());

    let config = if config_path.exists() {
        info!("Configuration file: {}", config_path.display());
        AppConfig::load(&config_path).await?
    } else {
        if args.config.is_none() {
            paths.ensure_directories()?;
        }
        info!("No configuration at {}, using defaults", config_path.display());
        AppConfig::default()
    };
    let touchpad = &config.touchpad;

    let skins = SkinDirectory::new(
        touchpad
            .skins_dir
            .clone()
            .unwrap_or_else(|| paths.skins_dir.clone()),
    );
    let listing = SkinListing::load(skins.listing_path());

    if args.list_skins {
        for name in &listing.names {
            println!("{}", name);
        }
        return Ok(());
    }

    if !touchpad.enabled {
        info!("Touchpad disabled in configuration, nothing to do");
        return Ok(());
    }

    let skin = args
        .skin
        .clone()
        .or_else(|| touchpad.skin.clone())
        .or_else(|| listing.first().map(str::to_string));
    if let Some(name) = &skin {
        if !listing.is_empty() && !listing.contains(name) {
            warn!("Skin '{}' is not in {}", name, skins.listing_path().display());
        }
    }

    let loader = touchpad.loader();
    let store = Arc::new(SkinStore::new());
    if let Err(e) = store.reload(&loader, skin.as_deref(), &skins, &skins) {
        error!("Touchpad stays inert: {}", e);
    }

    let _watcher = match (&skin, args.watch) {
        (Some(name), true) => {
            let mut watcher = SkinWatcher::new(skins.clone(), name.clone(), loader, store.clone())?;
            let handle = tokio::spawn(async move {
                while let Some(skin) = watcher.next_skin().await {
                    info!(
                        "Skin '{}' republished ({} regions)",
                        skin.info.name,
                        skin.regions.len()
                    );
                }
            });
            Some(handle)
        }
        (None, true) => {
            warn!("No skin selected, nothing to watch");
            None
        }
        _ => None,
    };

    if let Some(trace_path) = &args.trace {
        let trace = Trace::load(trace_path).await?;
        if trace.is_empty() {
            warn!("Trace {} contains no events", trace_path.display());
        }

        let mut pad = touchpad.touch_pad();
        let mut sink: Box<dyn ControllerSink> = match args.output {
            Output::Json => Box::new(JsonLinesSink::new(std::io::stdout().lock())),
            Output::Log => Box::new(TracingSink::default()),
        };
        trace.replay(&mut pad, &store, sink.as_mut())?;
    } else {
        let current = store.current();
        info!(
            "Skin '{}' by '{}': {} regions, {} aux buttons, analog: {}",
            current.info.name,
            current.info.author,
            current.regions.len(),
            current.aux_buttons.len(),
            current.analog.is_some()
        );
    }

    if args.watch {
        info!("Watching for skin changes, press Ctrl+C to exit");
        shutdown_signal().await;
    }

    info!("Touchpad Skin shutdown complete");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install CTRL+C signal handler: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
