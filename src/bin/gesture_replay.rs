//! gesture_replay - classify a recorded landmark capture
//!
//! Reads JSON-lines landmark frames from a file, stdin (`-`) or the scripted
//! demo (`stub://demo`), runs every frame through the gesture classifier and
//! the swap-on-change display, and prints a run summary.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use gesture_kernel::ingest::open_source;
use gesture_kernel::{
    AssetCatalog, DisplayController, GestureClassifier, GestureConfig, GestureLabel, LogPresenter,
    Pipeline, PipelineStats,
};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "gesture_replay",
    version,
    about = "Replay a landmark capture through the gesture classifier"
)]
struct Args {
    /// JSON-lines capture, `-` for stdin, or `stub://demo`
    #[arg(default_value = "stub://demo")]
    input: String,

    /// Config file (TOML, or JSON by extension). Overrides GESTURE_CONFIG.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Asset directory. Overrides the config file and GESTURE_ASSETS_DIR.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Print the summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// UI mode for stderr progress
    #[arg(long, value_enum, default_value_t = ui::UiMode::Auto, value_name = "MODE")]
    ui: ui::UiMode,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let is_tty = std::io::stderr().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();
    let ui = ui::Ui::new(args.ui, is_tty, !stdout_is_tty);

    let config = {
        let _stage = ui.stage("Load configuration");
        let mut config = GestureConfig::load_with(args.config.as_deref())?;
        if let Some(dir) = &args.assets {
            config.assets.dir = dir.clone();
        }
        config
    };

    let catalog = {
        let mut stage = ui.stage("Resolve assets");
        let catalog = AssetCatalog::from_settings(&config.assets);
        stage.update(format!(
            "{} of {} placeholders",
            catalog.placeholder_count(),
            GestureLabel::ALL.len()
        ));
        catalog
    };

    let source = open_source(&args.input)
        .with_context(|| format!("cannot open landmark source {}", args.input))?;
    let mut display = DisplayController::new(catalog, LogPresenter);
    display.prime()?;
    let mut pipeline = Pipeline::new(
        source,
        GestureClassifier::new(config.classifier),
        display,
    );

    let stats = {
        let mut stage = ui.stage(&format!("Replay {}", args.input));
        let mut frames = 0u64;
        while let Some(classification) = pipeline.step()? {
            frames += 1;
            stage.update(format!("{} frames, {}", frames, classification.label));
        }
        pipeline.stats()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_summary(&args.input, &stats);
    }
    Ok(())
}

fn print_summary(input: &str, stats: &PipelineStats) {
    println!("gesture_replay summary: {}", input);
    println!("  frames processed: {}", stats.frames);
    println!("  frames with hands: {}", stats.frames_with_hands);
    println!("  frames with face: {}", stats.frames_with_face);
    println!("  label changes: {}", stats.label_changes);
    println!("  elapsed: {:.2}s ({:.1} fps)", stats.elapsed_secs, stats.fps);
    if stats.lines_skipped > 0 {
        println!("  malformed lines skipped: {}", stats.lines_skipped);
    }
    if stats.presenter_errors > 0 {
        println!("  presenter errors: {}", stats.presenter_errors);
    }
    println!("  final gesture: {}", stats.final_label.display_name());
    println!("frames per gesture:");
    for (label, count) in &stats.per_label {
        if *count > 0 {
            println!("  {:<9} {}", label.as_str(), count);
        }
    }
}
