//! Scheduler limits and execution mode.

use serde::Deserialize;

/// Where extraction jobs run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
  /// On the rayon global pool.
  #[default]
  Pooled,
  /// Synchronously inside `pump`, on the calling thread. Deterministic; also
  /// the mode for targets without worker threads.
  Inline,
}

/// Bounds on outstanding generation work.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
  /// Jobs allowed to run at once.
  pub max_in_flight: usize,
  /// Jobs allowed to wait for a worker. Requests beyond this are deferred.
  pub max_queued: usize,
  pub mode: ExecutionMode,
}

impl Default for SchedulerConfig {
  fn default() -> Self {
    Self {
      max_in_flight: std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4),
      max_queued: 256,
      mode: ExecutionMode::Pooled,
    }
  }
}

impl SchedulerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Single-threaded configuration with room for the whole tree.
  pub fn inline() -> Self {
    Self {
      max_in_flight: 64,
      max_queued: 1024,
      mode: ExecutionMode::Inline,
    }
  }

  pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
    self.max_in_flight = max_in_flight;
    self
  }

  pub fn with_max_queued(mut self, max_queued: usize) -> Self {
    self.max_queued = max_queued;
    self
  }

  pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
    self.mode = mode;
    self
  }

  /// Both limits must be at least one.
  pub fn is_valid(&self) -> bool {
    self.max_in_flight > 0 && self.max_queued > 0
  }
}
