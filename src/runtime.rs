//! Cooperative event loop driving a run
//!
//! One task owns the engine and the terminal. Everything else (step
//! completions, key presses, SIGINT) arrives as a discrete event over a
//! channel and is processed to completion, in arrival order, before the
//! next. The only suspension point is the download step itself, which runs
//! as a spawned task and reports back through the same channel; the loop
//! never blocks on network I/O directly.

use std::sync::Arc;
use std::time::Duration;

use console::{Key, Term};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::engine::{Effect, Engine, Event};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::render::{Renderer, Theme};
use crate::resolver::RedirectResolver;
use crate::step::DownloadStep;
use crate::types::Outcome;

/// Interval between spinner frames; terminal width is re-sampled on the same
/// cadence, so a resize reflows the status line within one frame
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Final result of a run
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Outcomes of all completed entries, in list order
    pub outcomes: Vec<Outcome>,
    /// True when the run was ended early by the user
    pub cancelled: bool,
}

impl RunReport {
    /// Number of successful downloads
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    /// Number of per-item failures
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

/// Events delivered into the loop by its background sources
enum LoopEvent {
    /// The in-flight step finished (fatal errors propagate out of the loop)
    Step(Result<Outcome>),
    /// User cancellation (key press or signal)
    Cancel,
}

/// Owns one download run end to end
pub struct Runtime {
    config: Arc<Config>,
    manifest: Arc<Manifest>,
    renderer: Renderer,
    term: Term,
}

impl Runtime {
    /// Create a runtime for a loaded manifest
    pub fn new(config: Config, manifest: Manifest, theme: Theme) -> Self {
        Self {
            config: Arc::new(config),
            manifest: Arc::new(manifest),
            renderer: Renderer::new(theme),
            term: Term::stdout(),
        }
    }

    /// Execute the run to completion, cancellation, or fatal error
    ///
    /// Creates the destination directory if absent (fatal when that fails),
    /// prints the pack banner, then drives the engine until it terminates.
    pub async fn run(self) -> Result<RunReport> {
        tokio::fs::create_dir_all(&self.config.download.download_dir)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "failed to create download directory '{}': {}",
                        self.config.download.download_dir.display(),
                        e
                    ),
                ))
            })?;

        let resolver = Arc::new(RedirectResolver::new(&self.config.download)?);
        let step = Arc::new(DownloadStep::new(resolver, &self.config.download));

        let (tx, mut rx) = mpsc::unbounded_channel::<LoopEvent>();
        let cancel_token = CancellationToken::new();

        spawn_signal_listener(tx.clone());
        spawn_key_reader(self.term.clone(), tx.clone());

        self.term.write_str(&self.renderer.banner(&self.manifest))?;

        let mut engine = Engine::new(self.manifest.files.len());
        engine.handle(Event::Resized(self.terminal_width()));

        info!(entries = self.manifest.files.len(), "starting download run");

        let effects = engine.handle(Event::Started);
        self.execute(effects, &step, &tx, &cancel_token)?;

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        while !engine.is_terminated() {
            tokio::select! {
                _ = ticker.tick() => {
                    let effects = engine.handle(Event::Tick);
                    self.execute(effects, &step, &tx, &cancel_token)?;

                    let width = self.terminal_width();
                    if width != engine.width() {
                        let effects = engine.handle(Event::Resized(width));
                        self.execute(effects, &step, &tx, &cancel_token)?;
                    }
                }
                received = rx.recv() => {
                    let event = match received {
                        Some(LoopEvent::Step(Ok(outcome))) => Event::StepCompleted(outcome),
                        Some(LoopEvent::Step(Err(error))) => {
                            self.term.clear_line()?;
                            return Err(error);
                        }
                        Some(LoopEvent::Cancel) => Event::CancelRequested,
                        None => {
                            return Err(Error::EventLoop(
                                "all event sources closed unexpectedly".to_string(),
                            ));
                        }
                    };
                    let effects = engine.handle(event);
                    self.execute(effects, &step, &tx, &cancel_token)?;
                }
            }

            if !engine.is_terminated() {
                self.term.clear_line()?;
                self.term
                    .write_str(&self.renderer.status_line(&engine, &self.manifest.files))?;
            }
        }

        // No further step results are wanted; anything in flight finishes in
        // the background and its send is suppressed.
        cancel_token.cancel();

        self.term.clear_line()?;
        self.term.write_str(&self.renderer.summary(&engine))?;

        Ok(RunReport {
            outcomes: engine.outcomes().to_vec(),
            cancelled: engine.cancelled(),
        })
    }

    /// Execute the effects of one transition
    fn execute(
        &self,
        effects: Vec<Effect>,
        step: &Arc<DownloadStep>,
        tx: &mpsc::UnboundedSender<LoopEvent>,
        cancel_token: &CancellationToken,
    ) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::DispatchStep(index) => {
                    debug!(index, "dispatching step");
                    let step = Arc::clone(step);
                    let entry = self.manifest.files[index].clone();
                    let tx = tx.clone();
                    let token = cancel_token.clone();
                    tokio::spawn(async move {
                        let result = step.run(&entry).await;
                        if token.is_cancelled() {
                            return;
                        }
                        let _ = tx.send(LoopEvent::Step(result));
                    });
                }
                Effect::PrintCompletion(outcome) => {
                    self.term.clear_line()?;
                    self.term
                        .write_line(&self.renderer.completion_line(&outcome))?;
                }
                Effect::Quit => {
                    // Termination is carried in the engine phase; the loop
                    // condition observes it.
                }
            }
        }
        Ok(())
    }

    fn terminal_width(&self) -> u16 {
        let (_rows, columns) = self.term.size();
        columns
    }
}

/// Forward SIGINT into the loop as a cancellation event
fn spawn_signal_listener(tx: mpsc::UnboundedSender<LoopEvent>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(LoopEvent::Cancel);
        }
    });
}

/// Forward cancellation keys into the loop
///
/// Runs on a detached thread because `read_key` blocks; the thread dies with
/// the process. `q`, `escape`, and a raw-mode `ctrl+c` byte all cancel.
fn spawn_key_reader(term: Term, tx: mpsc::UnboundedSender<LoopEvent>) {
    if !term.is_term() {
        return;
    }
    std::thread::spawn(move || loop {
        match term.read_key() {
            Ok(Key::Char('q')) | Ok(Key::Escape) | Ok(Key::Char('\u{3}')) => {
                if tx.send(LoopEvent::Cancel).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}
