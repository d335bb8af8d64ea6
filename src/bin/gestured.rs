//! gestured - live gesture daemon
//!
//! This daemon:
//! 1. Loads configuration (`GESTURE_CONFIG` + environment overrides)
//! 2. Reads JSON-lines landmark frames from stdin as a tracker emits them
//! 3. Classifies each frame and swaps the displayed asset on label change
//! 4. Stops on EOF or Ctrl-C and logs a run summary

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use gesture_kernel::ingest::SourceStats;
use gesture_kernel::{
    AssetCatalog, DisplayController, GestureClassifier, GestureConfig, JsonlSource, LandmarkFrame,
    LandmarkSource, LogPresenter, Pipeline,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Frames forwarded from the stdin reader thread.
///
/// Reading stdin blocks, so it happens on its own thread; this side polls
/// the channel so a shutdown request is seen even while the tracker is idle.
struct ChannelSource {
    rx: mpsc::Receiver<LandmarkFrame>,
    shutdown: Arc<AtomicBool>,
    frames_read: u64,
}

impl LandmarkSource for ChannelSource {
    fn name(&self) -> &str {
        "stdin"
    }

    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                return Ok(None);
            }
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(frame) => {
                    self.frames_read += 1;
                    return Ok(Some(frame));
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            name: "stdin".to_string(),
            frames_read: self.frames_read,
            lines_skipped: 0,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GestureConfig::load()?;
    let catalog = AssetCatalog::from_settings(&config.assets);
    log::info!(
        "gestured: assets from {} ({} placeholders)",
        config.assets.dir.display(),
        catalog.placeholder_count()
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;

    let (tx, rx) = mpsc::sync_channel::<LandmarkFrame>(8);
    let reader = thread::Builder::new()
        .name("landmark-reader".to_string())
        .spawn(move || -> Result<SourceStats> {
            let mut source = JsonlSource::new("stdin", std::io::stdin().lock());
            while let Some(frame) = source.next_frame()? {
                if tx.send(frame).is_err() {
                    break;
                }
            }
            Ok(source.stats())
        })?;

    let source = ChannelSource {
        rx,
        shutdown: Arc::clone(&shutdown),
        frames_read: 0,
    };
    let mut display = DisplayController::new(catalog, LogPresenter);
    display.prime()?;
    let mut pipeline = Pipeline::new(source, GestureClassifier::new(config.classifier), display);

    log::info!("gestured running. reading landmark frames from stdin (Ctrl-C to stop)");
    let stats = pipeline.run_until(&shutdown)?;

    drop(pipeline);
    if shutdown.load(Ordering::SeqCst) {
        // The reader may be parked on a blocking stdin read; leave it behind.
        log::info!("shutdown signal received");
    } else {
        match reader.join() {
            Ok(Ok(source_stats)) if source_stats.lines_skipped > 0 => {
                log::warn!("skipped {} malformed lines", source_stats.lines_skipped)
            }
            Ok(Ok(_)) => {}
            Ok(Err(err)) => log::error!("landmark reader failed: {:#}", err),
            Err(_) => log::error!("landmark reader panicked"),
        }
    }

    log::info!(
        "gestured stopped: {} frames ({:.1} fps), {} with hands, {} with face, {} label changes, final {}",
        stats.frames,
        stats.fps,
        stats.frames_with_hands,
        stats.frames_with_face,
        stats.label_changes,
        stats.final_label
    );
    Ok(())
}
