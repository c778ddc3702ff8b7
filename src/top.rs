//! Top level: scheduler, shared memory and `num_cores` DMA + FFT pairs on
//! one clock.
//!
//! Every `tick` is one clock edge. External inputs are latched into the
//! modules, every module runs against last cycle's signals, and only then
//! are outputs copied into the inputs they drive.

use crate::builtin::{ComplexSample, Module, Wire};
use crate::config::FftConfig;
use crate::error::ConfigError;
use crate::fftdomain::{FftPipeline, FftSample};
use crate::memdomain::{DmaController, SharedMemory, WriteReq};
use crate::scheduler::InterleavedScheduler;
use log::debug;

pub struct InterleavedFft {
  config: FftConfig,

  // External inputs, sampled on the next tick. `start`, `rst` and
  // `mem_write` are pulses and drop after one tick.
  pub start: bool,
  pub rst: bool,
  pub mem_write: Wire<WriteReq>,
  base_addrs: Vec<u32>,
  num_samples: Vec<usize>,

  scheduler: InterleavedScheduler,
  memory: SharedMemory,
  dmas: Vec<DmaController>,
  ffts: Vec<FftPipeline>,

  cycle: u64,
}

impl InterleavedFft {
  /// Build the system. Core `i` defaults to reading `n_points` words from
  /// address `i * n_points`.
  pub fn new(config: FftConfig) -> Result<Self, ConfigError> {
    config.validate()?;

    let cores = config.num_cores;
    let mut dmas = Vec::with_capacity(cores);
    let mut ffts = Vec::with_capacity(cores);
    for i in 0..cores {
      dmas.push(DmaController::new(format!("dma_{}", i), config.addr_width, config.data_width)?);
      ffts.push(FftPipeline::new(format!("fft_{}", i), config.n_points)?);
    }

    let base_addrs = (0..cores).map(|i| (i * config.n_points) as u32).collect();
    let num_samples = vec![config.n_points; cores];

    Ok(Self {
      scheduler: InterleavedScheduler::new("sched", cores, config.hop_size)?,
      memory: SharedMemory::new("mem", config.mem_depth, cores)?,
      dmas,
      ffts,
      start: false,
      rst: false,
      mem_write: Wire::default(),
      base_addrs,
      num_samples,
      cycle: 0,
      config,
    })
  }

  /// One clock edge
  pub fn tick(&mut self) {
    self.run();
  }

  /// Tick `cycles` times
  pub fn step(&mut self, cycles: u64) {
    for _ in 0..cycles {
      self.run();
    }
  }

  fn reset_modules(&mut self) {
    self.memory.reset();
    self.scheduler.reset();
    for dma in self.dmas.iter_mut() {
      dma.reset();
    }
    for fft in self.ffts.iter_mut() {
      fft.reset();
    }
  }

  // Drive every module input from the registered outputs it listens to
  fn connect(&mut self) {
    for (i, (dma, fft)) in self.dmas.iter_mut().zip(self.ffts.iter_mut()).enumerate() {
      self.memory.read_addr[i] = dma.mem_addr();
      dma.mem_data = self.memory.read_data(i);
      dma.start = self.scheduler.core_start(i);
      fft.input = dma.stream_out();
    }
  }

  pub fn pulse_start(&mut self) {
    self.start = true;
  }

  pub fn pulse_reset(&mut self) {
    self.rst = true;
  }

  /// Queue a write on the memory write port for the next edge
  pub fn write_memory(&mut self, addr: u32, data: u64) {
    self.mem_write.set(WriteReq { addr, data });
  }

  /// Backdoor preload of consecutive words from `base`. Returns how many
  /// fit inside the memory.
  pub fn preload(&mut self, base: usize, words: &[u64]) -> usize {
    let mut written = 0;
    for (i, &word) in words.iter().enumerate() {
      if self.memory.init_write(base + i, word) {
        written += 1;
      }
    }
    written
  }

  /// Transfer parameters core `core` latches on its next start pulse
  pub fn set_core_transfer(&mut self, core: usize, base_addr: u32, num_samples: usize) -> Result<(), ConfigError> {
    if core >= self.config.num_cores {
      return Err(ConfigError::NoSuchCore {
        index: core,
        cores: self.config.num_cores,
      });
    }
    self.base_addrs[core] = base_addr;
    self.num_samples[core] = num_samples;
    Ok(())
  }

  pub fn core_transfer(&self, core: usize) -> Option<(u32, usize)> {
    Some((*self.base_addrs.get(core)?, *self.num_samples.get(core)?))
  }

  pub fn config(&self) -> &FftConfig {
    &self.config
  }

  pub fn num_cores(&self) -> usize {
    self.config.num_cores
  }

  /// Completed clock edges
  pub fn cycle(&self) -> u64 {
    self.cycle
  }

  /// Input-to-output latency of one FFT core
  pub fn latency(&self) -> usize {
    self.ffts.first().map(|f| f.latency()).unwrap_or(0)
  }

  /// Nothing pending, staggering, transferring or in flight
  pub fn is_idle(&self) -> bool {
    !self.start
      && !self.scheduler.is_active()
      && self.scheduler.core_starts().iter().all(|s| !s)
      && self.dmas.iter().all(|d| !d.busy() && !d.stream_out().valid)
      && self.ffts.iter().all(|f| !f.status() && !f.output().valid)
  }

  pub fn output(&self, core: usize) -> Wire<FftSample> {
    self.ffts.get(core).map(|f| f.output()).unwrap_or_default()
  }

  pub fn outputs(&self) -> Vec<Wire<FftSample>> {
    self.ffts.iter().map(|f| f.output()).collect()
  }

  pub fn dma_busy(&self, core: usize) -> bool {
    self.dmas.get(core).map(|d| d.busy()).unwrap_or(false)
  }

  pub fn mem_addr(&self, core: usize) -> Option<u32> {
    self.dmas.get(core).map(|d| d.mem_addr())
  }

  /// Samples streaming from core `core`'s DMA into its FFT this cycle
  pub fn fft_input(&self, core: usize) -> Wire<ComplexSample> {
    self.dmas.get(core).map(|d| d.stream_out()).unwrap_or_default()
  }

  pub fn core_status(&self, core: usize) -> bool {
    self.ffts.get(core).map(|f| f.status()).unwrap_or(false)
  }

  pub fn in_index(&self, core: usize) -> Option<usize> {
    self.ffts.get(core).map(|f| f.in_index())
  }

  pub fn core_start(&self, core: usize) -> bool {
    self.scheduler.core_start(core)
  }

  pub fn scheduler(&self) -> &InterleavedScheduler {
    &self.scheduler
  }

  pub fn memory(&self) -> &SharedMemory {
    &self.memory
  }

  pub fn dma(&self, core: usize) -> Option<&DmaController> {
    self.dmas.get(core)
  }

  pub fn fft(&self, core: usize) -> Option<&FftPipeline> {
    self.ffts.get(core)
  }
}

impl Module for InterleavedFft {
  fn run(&mut self) {
    self.scheduler.start = self.start;
    self.memory.write_req = self.mem_write;
    for (i, dma) in self.dmas.iter_mut().enumerate() {
      dma.base_addr = self.base_addrs[i];
      dma.num_samples = self.num_samples[i];
    }

    if self.rst {
      debug!("cycle {}: global reset", self.cycle);
      self.reset_modules();
    } else {
      if self.start {
        debug!("cycle {}: global start", self.cycle);
      }
      self.memory.run();
      for dma in self.dmas.iter_mut() {
        dma.run();
      }
      for fft in self.ffts.iter_mut() {
        fft.run();
      }
      self.scheduler.run();
    }

    self.start = false;
    self.rst = false;
    self.mem_write.clear();

    self.connect();
    self.cycle += 1;
  }

  /// Power-on reset, without a clock edge
  fn reset(&mut self) {
    self.reset_modules();
    self.start = false;
    self.rst = false;
    self.mem_write = Wire::default();
    self.connect();
  }

  fn name(&self) -> &str {
    "top"
  }
}
