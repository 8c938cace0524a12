//! Request lifecycle controller.
//!
//! `Studio` owns the one [`StudioState`] of the process and is the only thing
//! that replaces it. A processing run is two spawned tasks: the gateway call,
//! which [`Studio::process`] waits on, and a cosmetic ticker next to it. The
//! ticker is bound to a cancellation flag that is raised, under the state lock,
//! before the terminal transition is applied, so no tick can land after a run
//! ends.

mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use state::{download_name, ProcessJob, Status, StudioState, WritingJob};

use crate::gateway::Gateway;
use crate::image::ImageBuffer;
use crate::prompt::{Enhancement, Mode, WritingKind};

pub type CancellationToken = Arc<AtomicBool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Guard refused the run; nothing changed and the gateway was not called.
    Refused,
    Completed,
    Failed(String),
    /// The run was overtaken (mode switch, new upload, reset) before the
    /// gateway answered; the answer was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WritingOutcome {
    Refused,
    Written,
    Failed,
    Superseded,
}

struct Ticker {
    run: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn stop(self) {
        self.cancel.store(true, Ordering::Release);
        self.handle.abort();
    }
}

#[derive(Default)]
struct Inner {
    state: StudioState,
    ticker: Option<Ticker>,
}

impl Inner {
    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            debug!(run = ticker.run, "progress ticker stopped");
            ticker.stop();
        }
    }

    fn stop_ticker_for(&mut self, run: u64) {
        if self.ticker.as_ref().is_some_and(|t| t.run == run) {
            self.stop_ticker();
        }
    }
}

pub struct Studio {
    gateway: Arc<dyn Gateway>,
    tick: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl Studio {
    pub fn new(gateway: Arc<dyn Gateway>, tick: Duration) -> Self {
        Self {
            gateway,
            tick,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> StudioState {
        self.lock().state.clone()
    }

    /// Whether a progress ticker is still alive.
    pub fn is_ticking(&self) -> bool {
        self.lock()
            .ticker
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    pub fn switch_mode(&self, mode: Mode) -> StudioState {
        let mut inner = self.lock();
        inner.stop_ticker();
        inner.state = inner.state.switch_mode(mode);
        info!(%mode, "mode switched");
        inner.state.clone()
    }

    /// Stores a freshly uploaded image. Returns `None` while processing.
    pub fn select_image(&self, image: ImageBuffer) -> Option<StudioState> {
        let mut inner = self.lock();
        let next = inner.state.select_image(image)?;
        info!(
            mime = ?next.original_image().map(ImageBuffer::mime_type),
            "image selected"
        );
        inner.state = next;
        Some(inner.state.clone())
    }

    pub fn set_enhancement(&self, flag: Enhancement, on: bool) -> StudioState {
        let mut inner = self.lock();
        inner.state = inner.state.set_enhancement(flag, on);
        inner.state.clone()
    }

    pub fn toggle_enhancement(&self, flag: Enhancement) -> StudioState {
        let mut inner = self.lock();
        inner.state = inner.state.toggle_enhancement(flag);
        inner.state.clone()
    }

    pub fn set_prompt(&self, text: impl Into<String>) -> StudioState {
        let mut inner = self.lock();
        inner.state = inner.state.set_prompt(text);
        inner.state.clone()
    }

    pub fn new_project(&self) -> Option<StudioState> {
        let mut inner = self.lock();
        let next = inner.state.new_project()?;
        inner.stop_ticker();
        inner.state = next;
        info!("new project");
        Some(inner.state.clone())
    }

    pub fn dismiss_text(&self) -> StudioState {
        let mut inner = self.lock();
        inner.state = inner.state.dismiss_text();
        inner.state.clone()
    }

    /// Runs one image request and waits for it. The run itself is spawned, so
    /// dropping this future does not abandon it.
    pub async fn process(self: &Arc<Self>) -> ProcessOutcome {
        let Some(handle) = self.start_processing() else {
            return ProcessOutcome::Refused;
        };
        handle.await.unwrap_or_else(|e| {
            warn!(error = %e, "processing task failed");
            ProcessOutcome::Failed(e.to_string())
        })
    }

    /// Starts a run in the background. `None` when the guard refuses.
    pub fn start_processing(self: &Arc<Self>) -> Option<JoinHandle<ProcessOutcome>> {
        let job = self.begin_processing()?;
        let studio = Arc::clone(self);
        Some(tokio::spawn(async move { studio.run(job).await }))
    }

    /// Caption/story generation. Failures are logged and otherwise invisible.
    pub async fn write(self: &Arc<Self>, kind: WritingKind) -> WritingOutcome {
        let Some(handle) = self.start_writing(kind) else {
            return WritingOutcome::Refused;
        };
        handle.await.unwrap_or_else(|e| {
            warn!(error = %e, "writing task failed");
            WritingOutcome::Failed
        })
    }

    pub fn start_writing(self: &Arc<Self>, kind: WritingKind) -> Option<JoinHandle<WritingOutcome>> {
        let job = self.begin_writing(kind)?;
        let studio = Arc::clone(self);
        Some(tokio::spawn(async move { studio.run_writing(job).await }))
    }

    fn begin_processing(&self) -> Option<ProcessJob> {
        let mut inner = self.lock();
        let Some((next, job)) = inner.state.begin_processing() else {
            debug!("process refused by guard");
            return None;
        };
        inner.state = next;
        inner.stop_ticker();
        inner.ticker = Some(self.spawn_ticker(job.run));
        info!(
            run = job.run,
            mode = %job.mode,
            with_image = job.image.is_some(),
            "processing started"
        );
        Some(job)
    }

    async fn run(&self, job: ProcessJob) -> ProcessOutcome {
        let result = self
            .gateway
            .transform_image(&job.instruction, job.image.as_ref())
            .await;

        let mut inner = self.lock();
        inner.stop_ticker_for(job.run);

        match result {
            Ok(image) => match inner.state.succeed(job.run, image) {
                Some(next) => {
                    inner.state = next;
                    info!(run = job.run, "processing succeeded");
                    ProcessOutcome::Completed
                }
                None => {
                    debug!(run = job.run, "dropping result of superseded run");
                    ProcessOutcome::Superseded
                }
            },
            Err(e) => {
                let message = e.to_string();
                match inner.state.fail(job.run, message.clone()) {
                    Some(next) => {
                        inner.state = next;
                        warn!(run = job.run, error = %message, "processing failed");
                        ProcessOutcome::Failed(message)
                    }
                    None => {
                        debug!(run = job.run, "dropping failure of superseded run");
                        ProcessOutcome::Superseded
                    }
                }
            }
        }
    }

    fn begin_writing(&self, kind: WritingKind) -> Option<WritingJob> {
        let mut inner = self.lock();
        let (next, job) = inner.state.begin_writing(kind)?;
        inner.state = next;
        debug!(?kind, with_image = job.image.is_some(), "writing started");
        Some(job)
    }

    async fn run_writing(&self, job: WritingJob) -> WritingOutcome {
        let result = self.gateway.generate_text(job.prompt, job.image.as_ref()).await;

        let (text, outcome) = match result {
            Ok(text) => (Some(text), WritingOutcome::Written),
            Err(e) => {
                warn!(error = %e, "writing failed");
                (None, WritingOutcome::Failed)
            }
        };

        let mut inner = self.lock();
        match inner.state.finish_writing(job.run, text) {
            Some(next) => {
                inner.state = next;
                outcome
            }
            None => WritingOutcome::Superseded,
        }
    }

    fn spawn_ticker(&self, run: u64) -> Ticker {
        let cancel: CancellationToken = Arc::new(AtomicBool::new(false));
        let token = cancel.clone();
        let inner = Arc::clone(&self.inner);
        let period = self.tick;

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
                if token.load(Ordering::Acquire) {
                    break;
                }
                if let Some(next) = guard.state.tick(run) {
                    guard.state = next;
                    debug!(run, "progress tick");
                }
            }
        });

        Ticker {
            run,
            cancel,
            handle,
        }
    }
}
