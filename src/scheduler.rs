//! Staggered start of the DMA + FFT cores.
//!
//! A global start opens a window of `num_cores * hop_size` cycles. On
//! window cycle `t` core `i` receives a one-cycle start pulse when
//! `t == i * hop_size`. Global starts arriving while the window is open are
//! dropped.

use crate::builtin::Module;
use crate::config::validate_stagger;
use crate::error::ConfigError;
use log::debug;

pub struct InterleavedScheduler {
  name: String,
  num_cores: usize,
  hop_size: usize,

  // Input
  pub start: bool,

  // Outputs
  core_start: Vec<bool>,

  // State
  active: bool,
  counter: usize,
}

impl InterleavedScheduler {
  pub fn new(name: impl Into<String>, num_cores: usize, hop_size: usize) -> Result<Self, ConfigError> {
    validate_stagger(num_cores, hop_size)?;
    Ok(Self {
      name: name.into(),
      num_cores,
      hop_size,
      start: false,
      core_start: vec![false; num_cores],
      active: false,
      counter: 0,
    })
  }

  /// Start pulse towards core `core`
  pub fn core_start(&self, core: usize) -> bool {
    self.core_start.get(core).copied().unwrap_or(false)
  }

  pub fn core_starts(&self) -> &[bool] {
    &self.core_start
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Next window cycle to be evaluated
  pub fn counter(&self) -> usize {
    self.counter
  }

  /// Length of one stagger window in cycles
  pub fn window(&self) -> usize {
    self.num_cores * self.hop_size
  }
}

impl Module for InterleavedScheduler {
  fn run(&mut self) {
    if self.start {
      if self.active {
        debug!("[{}] global start ignored, stagger window open", self.name);
      } else {
        debug!("[{}] stagger window open", self.name);
        self.active = true;
        self.counter = 0;
      }
    }

    if !self.active {
      self.core_start.fill(false);
      return;
    }

    let t = self.counter;
    for (i, pulse) in self.core_start.iter_mut().enumerate() {
      *pulse = t == i * self.hop_size;
    }
    self.counter = t + 1;
    if self.counter >= self.window() {
      self.active = false;
      debug!("[{}] stagger window closed after {} cycles", self.name, self.counter);
    }
  }

  fn reset(&mut self) {
    self.start = false;
    self.core_start.fill(false);
    self.active = false;
    self.counter = 0;
  }

  fn name(&self) -> &str {
    &self.name
  }
}
