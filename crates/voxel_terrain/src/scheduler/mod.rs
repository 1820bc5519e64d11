//! Asynchronous chunk mesh generation.
//!
//! Following the IStage pattern: Request → Pump → Drain
//!
//! ```text
//!   request ──► queue (≤ max_queued) ──pump──► running (≤ max_in_flight)
//!                                                  │ rayon::spawn
//!                                                  ▼
//!   drain_completions ◄──── crossbeam channel ◄── worker (thread-local extractor)
//! ```
//!
//! At most one job exists per [`ChunkKey`]. Cancelling a running job only marks
//! it; the worker finishes and its result is discarded on drain, unless a new
//! request for the same key re-adopts it first.

mod config;
mod request;
mod worker;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

pub use config::{ExecutionMode, SchedulerConfig};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
pub use request::{ChunkCompletion, ChunkRequest, RequestStatus, WorkSource};
use tracing::trace;
use web_time::Instant;
pub use worker::with_extractor;

use crate::field::ScalarField;
use crate::metrics::SchedulerMetrics;
use crate::types::ChunkKey;

#[derive(Clone, Copy, Debug)]
struct RunningJob {
  cancelled: bool,
}

/// Bounded job queue that extracts chunk meshes off the calling thread.
pub struct ChunkGenerationScheduler<F> {
  field: Arc<F>,
  config: SchedulerConfig,
  queue: VecDeque<ChunkRequest>,
  queued_keys: HashSet<ChunkKey>,
  running: HashMap<ChunkKey, RunningJob>,
  sender: Sender<ChunkCompletion>,
  receiver: Receiver<ChunkCompletion>,
  metrics: SchedulerMetrics,
}

impl<F: ScalarField + Send + Sync + 'static> ChunkGenerationScheduler<F> {
  pub fn new(field: F, config: SchedulerConfig) -> Self {
    Self::with_shared_field(Arc::new(field), config)
  }

  pub fn with_shared_field(field: Arc<F>, config: SchedulerConfig) -> Self {
    let (sender, receiver) = crossbeam_channel::unbounded();
    Self {
      field,
      config,
      queue: VecDeque::new(),
      queued_keys: HashSet::new(),
      running: HashMap::new(),
      sender,
      receiver,
      metrics: SchedulerMetrics::new(),
    }
  }

  /// Ask for a chunk mesh. Never blocks.
  pub fn request(&mut self, request: ChunkRequest) -> RequestStatus {
    let key = request.key;

    if let Some(job) = self.running.get_mut(&key) {
      if job.cancelled {
        trace!(?key, "re-adopting cancelled job");
        job.cancelled = false;
      }
      return RequestStatus::AlreadyInFlight;
    }

    if self.queued_keys.contains(&key) {
      return RequestStatus::AlreadyInFlight;
    }

    if self.queue.len() >= self.config.max_queued {
      self.metrics.deferred += 1;
      return RequestStatus::Deferred;
    }

    self.queued_keys.insert(key);
    self.queue.push_back(request);
    RequestStatus::Queued
  }

  /// Dispatch queued requests while below `max_in_flight`.
  /// Returns the number of jobs started.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "scheduler::pump"))]
  pub fn pump(&mut self) -> usize {
    let mut dispatched = 0;

    while self.running.len() < self.config.max_in_flight {
      let Some(request) = self.queue.pop_front() else {
        break;
      };
      self.queued_keys.remove(&request.key);
      self.dispatch(request);
      dispatched += 1;
    }

    dispatched
  }

  fn dispatch(&mut self, request: ChunkRequest) {
    self.running.insert(request.key, RunningJob { cancelled: false });
    self.metrics.dispatched += 1;

    match self.config.mode {
      ExecutionMode::Inline => {
        let completion = worker::run(&*self.field, request);
        // Receiver lives in self; an unbounded send cannot fail here.
        let _ = self.sender.send(completion);
      }
      ExecutionMode::Pooled => {
        let field = Arc::clone(&self.field);
        let sender = self.sender.clone();
        rayon::spawn(move || {
          let completion = worker::run(&*field, request);
          // The scheduler may have been dropped while this job ran.
          let _ = sender.send(completion);
        });
      }
    }
  }

  /// Collect finished jobs without blocking.
  ///
  /// Results of cancelled jobs are dropped. Every drained job frees its
  /// in-flight slot.
  pub fn drain_completions(&mut self) -> Vec<ChunkCompletion> {
    let mut completions = Vec::new();
    while let Ok(completion) = self.receiver.try_recv() {
      self.accept(completion, &mut completions);
    }
    completions
  }

  fn accept(&mut self, completion: ChunkCompletion, out: &mut Vec<ChunkCompletion>) {
    match self.running.remove(&completion.key) {
      Some(RunningJob { cancelled: false }) => {
        self
          .metrics
          .record_completion(completion.elapsed_us, completion.mesh.triangle_count());
        out.push(completion);
      }
      Some(RunningJob { cancelled: true }) | None => {
        trace!(key = ?completion.key, "discarding cancelled job");
        self.metrics.discarded += 1;
      }
    }
  }

  /// Cancel the job for `key`. Queued jobs are removed; running jobs finish
  /// and their result is discarded.
  pub fn cancel(&mut self, key: &ChunkKey) -> bool {
    if self.queued_keys.remove(key) {
      self.queue.retain(|request| request.key != *key);
      self.metrics.cancelled += 1;
      return true;
    }

    match self.running.get_mut(key) {
      Some(job) if !job.cancelled => {
        job.cancelled = true;
        self.metrics.cancelled += 1;
        true
      }
      _ => false,
    }
  }

  /// Cancel everything queued or running.
  pub fn cancel_all(&mut self) {
    let queued = self.queue.len() as u64;
    self.queue.clear();
    self.queued_keys.clear();
    self.metrics.cancelled += queued;

    for job in self.running.values_mut() {
      if !job.cancelled {
        job.cancelled = true;
        self.metrics.cancelled += 1;
      }
    }
  }

  /// Block until nothing is queued or running, or until `timeout` elapses.
  ///
  /// Keeps dispatching queued work while waiting. Returns the completions
  /// collected along the way.
  pub fn wait_idle(&mut self, timeout: Duration) -> Vec<ChunkCompletion> {
    let deadline = Instant::now() + timeout;
    let mut completions = Vec::new();

    loop {
      self.pump();
      if self.is_idle() {
        break;
      }

      let remaining = deadline.saturating_duration_since(Instant::now());
      if remaining.is_zero() {
        break;
      }

      match self.receiver.recv_timeout(remaining) {
        Ok(completion) => self.accept(completion, &mut completions),
        Err(RecvTimeoutError::Timeout) => break,
        Err(RecvTimeoutError::Disconnected) => break,
      }
    }

    completions
  }

  /// Swap the field for jobs dispatched from now on. Running jobs keep the
  /// field they started with.
  pub fn set_field(&mut self, field: Arc<F>) {
    self.field = field;
  }

  pub fn field(&self) -> &Arc<F> {
    &self.field
  }

  pub fn is_queued(&self, key: &ChunkKey) -> bool {
    self.queued_keys.contains(key)
  }

  pub fn is_running(&self, key: &ChunkKey) -> bool {
    self.running.contains_key(key)
  }

  pub fn in_flight_count(&self) -> usize {
    self.running.len()
  }

  pub fn queued_count(&self) -> usize {
    self.queue.len()
  }

  /// True when no work is queued or running.
  pub fn is_idle(&self) -> bool {
    self.queue.is_empty() && self.running.is_empty()
  }

  pub fn metrics(&self) -> &SchedulerMetrics {
    &self.metrics
  }

  pub fn config(&self) -> &SchedulerConfig {
    &self.config
  }
}
