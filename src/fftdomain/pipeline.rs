use super::stage::{ButterflyStage, StageConfig, StageControl};
use super::valid_pipe::ValidPipe;
use crate::builtin::{ComplexSample, Module, Wire};
use crate::config::validate_fft_size;
use crate::error::ConfigError;
use crate::reference::bit_reverse;
use log::{debug, trace};

/// One transformed sample leaving a pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FftSample {
  /// Frequency bin this sample belongs to
  pub index: usize,
  pub value: ComplexSample,
}

/// Streaming N-point DIF FFT built from log2(N) butterfly stages.
///
/// Accepts one sample per valid cycle and keeps advancing while anything is
/// still in flight. Results leave in bit-reversed bin order, one per cycle,
/// `latency()` cycles after the matching input.
pub struct FftPipeline {
  name: String,
  n_points: usize,
  bits: u32,
  latency: usize,

  // Input from the DMA
  pub input: Wire<ComplexSample>,

  // Output, derived from registers after every edge
  output: Wire<FftSample>,

  stages: Vec<ButterflyStage>,
  valid_pipe: ValidPipe,
  samples_in: usize,
  out_counter: usize,
  flushing: bool,
}

impl FftPipeline {
  pub fn new(name: impl Into<String>, n_points: usize) -> Result<Self, ConfigError> {
    validate_fft_size(n_points)?;
    let name = name.into();
    let bits = n_points.trailing_zeros();

    // Each stage's counter starts where data reaches it after the latency of
    // everything upstream, so all stages see a block boundary together.
    let mut stages = Vec::with_capacity(bits as usize);
    let mut latency = 0;
    for i in 0..bits {
      let size = n_points >> i;
      let offset = (size - (latency % size)) % size;
      let config = StageConfig::new(size, offset)?;
      latency += config.latency();
      stages.push(ButterflyStage::new(format!("{}.stage_{}", name, i), config));
    }

    let mut pipeline = Self {
      name,
      n_points,
      bits,
      latency,
      input: Wire::default(),
      output: Wire::default(),
      stages,
      valid_pipe: ValidPipe::new(latency),
      samples_in: 0,
      out_counter: n_points - 1,
      flushing: false,
    };
    pipeline.refresh_output();
    Ok(pipeline)
  }

  pub fn n_points(&self) -> usize {
    self.n_points
  }

  pub fn num_stages(&self) -> usize {
    self.stages.len()
  }

  pub fn stages(&self) -> &[ButterflyStage] {
    &self.stages
  }

  /// Cycles from a valid input to its first valid output
  pub fn latency(&self) -> usize {
    self.latency
  }

  /// Advance while a sample arrives or any sample is still in flight
  pub fn internal_enable(&self) -> bool {
    self.input.valid || self.valid_pipe.any()
  }

  /// Start of a fresh block on an empty pipeline. Never raised between
  /// back-to-back blocks, which keeps continuous streams pipelined.
  pub fn sync_restart(&self) -> bool {
    self.samples_in == 0 && self.input.valid && !self.valid_pipe.any()
  }

  pub fn status(&self) -> bool {
    self.internal_enable() || self.flushing
  }

  /// Position of the next input sample within its block
  pub fn in_index(&self) -> usize {
    self.samples_in
  }

  pub fn output(&self) -> Wire<FftSample> {
    self.output
  }

  fn refresh_output(&mut self) {
    if self.valid_pipe.last() {
      let value = self.stages.last().map(|s| s.data_out()).unwrap_or_default();
      self.output.set(FftSample {
        index: bit_reverse(self.out_counter, self.bits),
        value,
      });
    } else {
      self.output = Wire::default();
    }
  }
}

impl Module for FftPipeline {
  fn run(&mut self) {
    let ctrl = StageControl {
      enable: self.internal_enable(),
      sync: self.sync_restart(),
    };
    if !ctrl.enable {
      return;
    }

    let in_valid = self.input.valid;
    if ctrl.sync {
      debug!("[{}] new block epoch", self.name);
    }

    // Every stage consumes its upstream neighbour's output from before
    // this edge.
    let mut upstream = if in_valid { self.input.value } else { ComplexSample::default() };
    for stage in self.stages.iter_mut() {
      let previous_out = stage.data_out();
      stage.data_in = upstream;
      stage.ctrl = ctrl;
      stage.run();
      upstream = previous_out;
    }

    // The bit one slot before the end predicts next cycle's output validity
    let will_be_valid = if self.latency > 1 {
      self.valid_pipe.get(self.latency - 2)
    } else {
      in_valid
    };

    self.valid_pipe.shift_in(in_valid);

    if in_valid {
      trace!("[{}] in[{}] = {}", self.name, self.samples_in, self.input.value);
      self.samples_in = (self.samples_in + 1) % self.n_points;
    }

    self.flushing = will_be_valid;
    if will_be_valid {
      self.out_counter = (self.out_counter + 1) % self.n_points;
    }
    if ctrl.sync {
      self.out_counter = self.n_points - 1;
    }

    self.refresh_output();
  }

  fn reset(&mut self) {
    for stage in self.stages.iter_mut() {
      stage.reset();
    }
    self.input = Wire::default();
    self.valid_pipe.clear();
    self.samples_in = 0;
    self.out_counter = self.n_points - 1;
    self.flushing = false;
    self.refresh_output();
  }

  fn name(&self) -> &str {
    &self.name
  }
}
