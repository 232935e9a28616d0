//! Application entry point: passage question generator.
//!
//! # Startup sequence
//!
//! 1. Read `.env` and initialise logging.
//! 2. Load [`AppConfig`] from disk. On first run the defaults are written
//!    out; `OPENAI_API_KEY` is applied afterwards so it never lands in the
//!    file.
//! 3. Create the [`tokio`] runtime.
//! 4. Build the completion client, speech backend and user store.
//! 5. Spawn the pipeline orchestrator on the runtime.
//! 6. Run [`eframe::run_native`], which blocks until the window is closed.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use tokio::sync::mpsc;

use passage_quiz::{
    app::{install_fonts, QuizApp, APP_TITLE},
    config::{AppConfig, AppPaths},
    export::{GoogleTranslateTts, SpeechSynthesizer},
    llm::{ApiClient, CompletionClient},
    pipeline::{new_shared_state, PipelineCommand, PipelineOrchestrator},
    store::UserData,
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title(APP_TITLE)
        .with_inner_size([width, height])
        .with_min_inner_size([720.0, 480.0]);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Environment + logging
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("{APP_TITLE} starting up");

    // 2. Configuration
    let settings_file = AppPaths::new().settings_file;
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if !settings_file.exists() {
        // First run: write the defaults so ui.font_path etc. can be edited.
        match config.save() {
            Ok(()) => log::info!("wrote default settings to {}", settings_file.display()),
            Err(e) => log::warn!("could not write {}: {e}", settings_file.display()),
        }
    }
    let config = config.with_env();
    if config.llm.api_key.is_none() {
        log::warn!("no API key configured; set OPENAI_API_KEY or llm.api_key");
    }

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Services
    let client: Arc<dyn CompletionClient> = Arc::new(ApiClient::from_config(&config.llm));
    let speech: Arc<dyn SpeechSynthesizer> =
        Arc::new(GoogleTranslateTts::from_config(&config.speech));
    let store = Arc::new(UserData::from_config(&config.storage));

    // 5. Orchestrator
    let state = new_shared_state(config.clone());
    let (command_tx, command_rx) = mpsc::channel::<PipelineCommand>(16);
    let orchestrator = PipelineOrchestrator::new(Arc::clone(&state), client, speech, store);
    rt.spawn(orchestrator.run(command_rx));

    // 6. Window
    let app = QuizApp::new(command_tx, state, &config);
    let font_path = config.ui.font_path.clone();

    eframe::run_native(
        APP_TITLE,
        native_options(&config),
        Box::new(move |cc| {
            install_fonts(&cc.egui_ctx, font_path.as_deref());
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window closed with error: {e}"))?;

    log::info!("window closed, shutting down");
    Ok(())
}
