//! Single-flight background search.
//!
//! A [`SearchWorker`] runs one [`Strategy`] at a time on a background
//! thread against a snapshot of the board. The frame loop polls
//! [`SearchWorker::is_running`] and reads the result once the flag drops.
//!
//! The worker thread sends a completion message over a channel and only
//! then clears the running flag with `Release`. The poller loads the flag
//! with `Acquire`, so a cleared flag guarantees the message is already
//! queued. A search that panics completes with no result.

use super::{SearchResult, Strategy};
use crate::games::morris::{BoardView, Position, Side};
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, instrument, warn};

const THREAD_NAME: &str = "morris-search";

/// How the worker obtains threads.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkerMode {
    /// One short-lived thread per search.
    #[default]
    Spawn,
    /// One parked thread fed with jobs over a channel.
    Pooled,
}

#[derive(Clone)]
struct Job {
    position: Position,
    side: Side,
    strategy: Arc<dyn Strategy>,
}

struct Pool {
    jobs: Sender<Job>,
    thread: JoinHandle<()>,
}

/// Sends the completion message and then clears the running flag, even if
/// the strategy panics.
struct RunningGuard<'a> {
    running: &'a AtomicBool,
    results: &'a Sender<Option<SearchResult>>,
    result: Option<SearchResult>,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        // The receiver lives in the worker, which outlives every search it starts.
        let _ = self.results.send(self.result.take());
        self.running.store(false, Ordering::Release);
    }
}

/// Decrements the live-thread count when its thread exits.
struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

fn run_job(job: Job, running: &AtomicBool, results: &Sender<Option<SearchResult>>) {
    let mut guard = RunningGuard {
        running,
        results,
        result: None,
    };
    let Job {
        position,
        side,
        strategy,
    } = job;
    let result = strategy.search(position, side);
    debug!(strategy = strategy.name(), ?result, "Search finished");
    drop(strategy);
    guard.result = Some(result);
}

/// Background search wrapper with at most one computation in flight.
pub struct SearchWorker {
    mode: WorkerMode,
    running: Arc<AtomicBool>,
    live: Arc<AtomicUsize>,
    searches_started: u64,
    result: Option<SearchResult>,
    results_tx: Sender<Option<SearchResult>>,
    results_rx: Receiver<Option<SearchResult>>,
    search_thread: Option<JoinHandle<()>>,
    pool: Option<Pool>,
}

impl SearchWorker {
    /// Creates a worker that spawns one thread per search.
    pub fn new() -> Self {
        Self::with_mode(WorkerMode::Spawn)
    }

    /// Creates a worker backed by a single reusable thread.
    pub fn pooled() -> Self {
        Self::with_mode(WorkerMode::Pooled)
    }

    /// Creates a worker in the given mode.
    ///
    /// No thread is created until the first search.
    #[instrument]
    pub fn with_mode(mode: WorkerMode) -> Self {
        let (results_tx, results_rx) = crossbeam_channel::unbounded();
        Self {
            mode,
            running: Arc::new(AtomicBool::new(false)),
            live: Arc::new(AtomicUsize::new(0)),
            searches_started: 0,
            result: None,
            results_tx,
            results_rx,
            search_thread: None,
            pool: None,
        }
    }

    /// Worker mode.
    pub fn mode(&self) -> WorkerMode {
        self.mode
    }

    /// Snapshots the board and starts `strategy` in the background.
    ///
    /// Must not be called while a search is running. Returns immediately.
    #[instrument(skip(self, board, strategy), fields(strategy = strategy.name(), mode = %self.mode))]
    pub fn start(&mut self, board: &impl BoardView, strategy: Arc<dyn Strategy>) {
        debug_assert!(!self.is_running(), "search started while another is running");
        if self.is_running() {
            warn!("Search started while another is running, waiting for it");
            self.join();
        }

        self.reap_search_thread();
        self.result = None;
        while self.results_rx.try_recv().is_ok() {}

        let job = Job {
            position: board.position(),
            side: board.turn(),
            strategy,
        };

        self.running.store(true, Ordering::Release);
        self.searches_started += 1;
        debug!(side = %job.side, search = self.searches_started, "Search started");

        match self.mode {
            WorkerMode::Spawn => self.spawn_search(job),
            WorkerMode::Pooled => self.dispatch_pooled(job),
        }
    }

    /// True while a search is in flight. Never blocks.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Result of the last finished search.
    ///
    /// Returns `None` while a search is running, before the first one, or
    /// when the last search panicked.
    /// The value stays the same until the next [`SearchWorker::start`].
    pub fn get_result(&mut self) -> Option<SearchResult> {
        if !self.is_running() {
            self.drain_results();
        }
        self.result
    }

    /// Blocks until the running search, if any, has finished.
    #[instrument(skip(self))]
    pub fn join(&mut self) {
        match self.mode {
            WorkerMode::Spawn => self.reap_search_thread(),
            WorkerMode::Pooled => {
                while self.is_running() {
                    // Every started search sends exactly one message.
                    match self.results_rx.recv() {
                        Ok(message) => {
                            self.result = message;
                            // The flag drops right after the message is sent.
                            while self.is_running() {
                                thread::yield_now();
                            }
                        }
                        Err(_) => break,
                    }
                }
            }
        }
        self.drain_results();
    }

    /// Number of worker threads currently alive.
    pub fn live_threads(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Number of searches started over the worker's lifetime.
    pub fn searches_started(&self) -> u64 {
        self.searches_started
    }

    fn drain_results(&mut self) {
        while let Ok(message) = self.results_rx.try_recv() {
            self.result = message;
        }
    }

    fn reap_search_thread(&mut self) {
        if let Some(handle) = self.search_thread.take()
            && handle.join().is_err()
        {
            error!("Search thread panicked");
        }
    }

    fn spawn_search(&mut self, job: Job) {
        let running = Arc::clone(&self.running);
        let results = self.results_tx.clone();
        let live = Arc::clone(&self.live);
        let fallback = job.clone();

        self.live.fetch_add(1, Ordering::AcqRel);
        let spawned = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let _alive = LiveGuard(live);
                run_job(job, &running, &results);
            });

        match spawned {
            Ok(handle) => self.search_thread = Some(handle),
            Err(e) => {
                self.live.fetch_sub(1, Ordering::AcqRel);
                error!(error = %e, "Failed to spawn search thread, searching inline");
                run_job(fallback, &self.running, &self.results_tx);
            }
        }
    }

    fn dispatch_pooled(&mut self, job: Job) {
        if self.pool.is_none() {
            self.spawn_pool();
        }

        let Some(pool) = &self.pool else {
            run_job(job, &self.running, &self.results_tx);
            return;
        };

        if let Err(returned) = pool.jobs.send(job) {
            warn!("Pool thread is gone, restarting it");
            self.shutdown_pool();
            self.spawn_pool();
            match &self.pool {
                Some(pool) => {
                    if let Err(returned) = pool.jobs.send(returned.into_inner()) {
                        error!("Restarted pool thread refused the job, searching inline");
                        run_job(returned.into_inner(), &self.running, &self.results_tx);
                    }
                }
                None => run_job(returned.into_inner(), &self.running, &self.results_tx),
            }
        }
    }

    fn spawn_pool(&mut self) {
        let (jobs_tx, jobs_rx) = crossbeam_channel::unbounded::<Job>();
        let running = Arc::clone(&self.running);
        let results = self.results_tx.clone();
        let live = Arc::clone(&self.live);

        self.live.fetch_add(1, Ordering::AcqRel);
        let spawned = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let _alive = LiveGuard(live);
                for job in jobs_rx.iter() {
                    let outcome =
                        panic::catch_unwind(AssertUnwindSafe(|| run_job(job, &running, &results)));
                    if outcome.is_err() {
                        error!("Search panicked, pool thread keeps serving");
                    }
                }
                debug!("Pool thread exiting");
            });

        match spawned {
            Ok(thread) => {
                info!("Pool thread started");
                self.pool = Some(Pool {
                    jobs: jobs_tx,
                    thread,
                });
            }
            Err(e) => {
                self.live.fetch_sub(1, Ordering::AcqRel);
                error!(error = %e, "Failed to spawn pool thread");
            }
        }
    }

    fn shutdown_pool(&mut self) {
        if let Some(Pool { jobs, thread }) = self.pool.take() {
            drop(jobs);
            if thread.join().is_err() {
                error!("Pool thread panicked");
            }
        }
    }
}

impl Default for SearchWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SearchWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchWorker")
            .field("mode", &self.mode)
            .field("running", &self.is_running())
            .field("live_threads", &self.live_threads())
            .field("searches_started", &self.searches_started)
            .field("result", &self.result)
            .finish()
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.join();
        self.shutdown_pool();
    }
}
