//! One radix-2 decimation-in-frequency butterfly stage.
//!
//! A stage of size `S` repeats an `S`-cycle block:
//!
//! * Store & forward (`c < S/2`): latch the input into `buf_in[c]` and emit
//!   the difference term parked in `buf_out[c]` during the previous block.
//! * Compute (`c >= S/2`): pair `buf_in[k]` with the live input, emit the
//!   sum on this edge and park the twiddled difference in `buf_out[k]`.
//!
//! The output is registered, so a stage adds `S/2 + 1` cycles of latency
//! when cascaded.

use crate::builtin::{ComplexSample, Module};
use crate::error::ConfigError;
use std::f64::consts::PI;

/// Size and phase alignment of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
  size: usize,
  half: usize,
  offset: usize,
}

impl StageConfig {
  pub fn new(size: usize, offset: usize) -> Result<Self, ConfigError> {
    if size < 2 || !size.is_power_of_two() {
      return Err(ConfigError::InvalidFftSize(size));
    }
    Ok(Self {
      size,
      half: size / 2,
      offset: offset % size,
    })
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn half(&self) -> usize {
    self.half
  }

  /// Counter value loaded on reset and on an epoch restart
  pub fn offset(&self) -> usize {
    self.offset
  }

  /// Cycles this stage adds to a cascade
  pub fn latency(&self) -> usize {
    self.half + 1
  }
}

/// Which half of the block a counter value falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  StoreForward(usize),
  Compute(usize),
}

/// Control inputs broadcast by the owning pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageControl {
  pub enable: bool,
  /// Snap the counter to the offset and clear both buffers this edge
  pub sync: bool,
}

pub struct ButterflyStage {
  name: String,
  config: StageConfig,

  // Inputs
  pub data_in: ComplexSample,
  pub ctrl: StageControl,

  // Output register
  data_out: ComplexSample,

  // State
  counter: usize,
  buf_in: Vec<ComplexSample>,
  buf_out: Vec<ComplexSample>,

  // Twiddle ROM, W_S^k for k in 0..S/2
  twiddles: Vec<ComplexSample>,
}

impl ButterflyStage {
  pub fn new(name: impl Into<String>, config: StageConfig) -> Self {
    let twiddles = (0..config.half)
      .map(|k| {
        let angle = -2.0 * PI * k as f64 / config.size as f64;
        ComplexSample::from_polar(1.0, angle)
      })
      .collect();

    Self {
      name: name.into(),
      config,
      data_in: ComplexSample::default(),
      ctrl: StageControl::default(),
      data_out: ComplexSample::default(),
      counter: config.offset,
      buf_in: vec![ComplexSample::default(); config.half],
      buf_out: vec![ComplexSample::default(); config.half],
      twiddles,
    }
  }

  pub fn config(&self) -> &StageConfig {
    &self.config
  }

  pub fn data_out(&self) -> ComplexSample {
    self.data_out
  }

  pub fn counter(&self) -> usize {
    self.counter
  }

  pub fn phase(&self, counter: usize) -> Phase {
    if counter < self.config.half {
      Phase::StoreForward(counter)
    } else {
      Phase::Compute(counter - self.config.half)
    }
  }

  pub fn twiddle(&self, k: usize) -> ComplexSample {
    self.twiddles[k]
  }

  fn clear_buffers(&mut self) {
    self.buf_in.fill(ComplexSample::default());
    self.buf_out.fill(ComplexSample::default());
  }
}

impl Module for ButterflyStage {
  fn run(&mut self) {
    if !self.ctrl.enable {
      return;
    }

    let mut c = self.counter;
    if self.ctrl.sync {
      c = self.config.offset;
      self.clear_buffers();
    }

    let input = self.data_in;
    self.data_out = match self.phase(c) {
      Phase::StoreForward(slot) => {
        self.buf_in[slot] = input;
        self.buf_out[slot]
      },
      Phase::Compute(k) => {
        let a = self.buf_in[k];
        self.buf_out[k] = (a - input) * self.twiddles[k];
        a + input
      },
    };

    self.counter = (c + 1) % self.config.size;
  }

  fn reset(&mut self) {
    self.counter = self.config.offset;
    self.data_in = ComplexSample::default();
    self.ctrl = StageControl::default();
    self.data_out = ComplexSample::default();
    self.clear_buffers();
  }

  fn name(&self) -> &str {
    &self.name
  }
}
