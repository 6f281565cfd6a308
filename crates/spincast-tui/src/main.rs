// Spincast entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Pick a speech backend and spawn the announcer
// 4. Build the spin engine
// 5. Create mpsc channels
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::sync::Arc;

use spincast_core::config::{self, SpeechConfig};
use spincast_core::engine::{EngineSettings, SpinEngine};
use spincast_core::selector::StdRandom;
use spincast_core::speech::{Announcer, CommandSpeaker, SilentSpeaker, SpeechBackend};
use spincast_tui::app;
use spincast_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Spincast starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {}ms spins, {}-{} extra turns, recap of {}",
        config.wheel.spin_duration_ms,
        config.wheel.min_revolutions,
        config.wheel.max_revolutions,
        config.wheel.recap_len
    );

    // 3. Speech
    let announcer = Announcer::spawn(select_backend(&config.speech));

    // 4. Engine
    let engine = SpinEngine::new(
        &config.wheel.default_list,
        EngineSettings::from(&config.wheel),
        Box::new(StdRandom::from_entropy()),
    );
    info!("Wheel loaded with {} items", engine.pool().len());

    // 5. Channels
    let (settle_tx, settle_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, engine, announcer, settle_tx);

    // 6. App logic
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, settle_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. TUI, blocking until the user quits
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Spincast shut down cleanly");
    Ok(())
}

/// Configured command, else the first synthesizer on PATH, else silence.
fn select_backend(speech: &SpeechConfig) -> Arc<dyn SpeechBackend> {
    if !speech.enabled {
        info!("Speech disabled in config");
        return Arc::new(SilentSpeaker);
    }
    if let Some(command) = &speech.command {
        return Arc::new(CommandSpeaker::with_command(command.clone()));
    }
    match CommandSpeaker::detect() {
        Some(speaker) => Arc::new(speaker),
        None => {
            warn!("No speech synthesizer found on PATH; announcements are silent");
            Arc::new(SilentSpeaker)
        }
    }
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("spincast.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("spincast=info,spincast_core=info,spincast_tui=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
