// Streaming DMA: walks a run of words in shared memory and feeds one core

use crate::builtin::{unpack_word, ComplexSample, Module, Wire};
use crate::config::addr_mask;
use crate::error::ConfigError;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaState {
  Idle,
  /// Issuing one read address per cycle
  Streaming,
  /// All addresses issued, waiting for the last read to return
  Draining,
}

pub struct DmaController {
  name: String,
  addr_mask: u32,
  data_width: u32,

  // Inputs
  pub start: bool,
  pub base_addr: u32,
  pub num_samples: usize,
  /// Registered read data from this core's memory port
  pub mem_data: u64,

  // Outputs
  mem_addr: u32,
  busy: bool,

  // State
  state: DmaState,
  counter: usize,
  current_addr: u32,
  // transfer parameters, latched when the start is accepted
  total: usize,
  base: u32,
  // read issued two edges ago / one edge ago
  read_req: bool,
  read_wait: bool,
}

impl DmaController {
  pub fn new(name: impl Into<String>, addr_width: u32, data_width: u32) -> Result<Self, ConfigError> {
    if addr_width == 0 || addr_width > 32 {
      return Err(ConfigError::InvalidAddrWidth(addr_width));
    }
    if data_width < 2 || data_width > 64 || data_width % 2 != 0 {
      return Err(ConfigError::InvalidDataWidth(data_width));
    }
    Ok(Self {
      name: name.into(),
      addr_mask: addr_mask(addr_width),
      data_width,
      start: false,
      base_addr: 0,
      num_samples: 0,
      mem_data: 0,
      mem_addr: 0,
      busy: false,
      state: DmaState::Idle,
      counter: 0,
      current_addr: 0,
      total: 0,
      base: 0,
      read_req: false,
      read_wait: false,
    })
  }

  /// Read address presented to the memory port
  pub fn mem_addr(&self) -> u32 {
    self.mem_addr
  }

  pub fn busy(&self) -> bool {
    self.busy
  }

  pub fn state(&self) -> DmaState {
    self.state
  }

  /// Reads issued so far in the current transfer
  pub fn sample_counter(&self) -> usize {
    self.counter
  }

  /// Next address to be issued
  pub fn current_addr(&self) -> u32 {
    self.current_addr
  }

  /// Base address latched for the current transfer
  pub fn latched_base(&self) -> u32 {
    self.base
  }

  /// Sample stream towards the FFT core. Valid exactly in the cycle the
  /// memory data for an issued read is on `mem_data`.
  pub fn stream_out(&self) -> Wire<ComplexSample> {
    if self.read_req {
      Wire::asserted(unpack_word(self.mem_data, self.data_width))
    } else {
      Wire::idle()
    }
  }

  /// Put `addr` on the port and step to the next one
  fn issue(&mut self, addr: u32) {
    self.mem_addr = addr;
    self.current_addr = addr.wrapping_add(1) & self.addr_mask;
    self.counter += 1;
    trace!("[{}] read #{} at {}", self.name, self.counter, addr);
  }
}

impl Module for DmaController {
  fn run(&mut self) {
    let mut issuing = false;

    match self.state {
      DmaState::Idle => {
        if self.start {
          self.base = self.base_addr & self.addr_mask;
          self.total = self.num_samples;
          self.busy = true;
          self.counter = 0;
          debug!("[{}] start base={} samples={}", self.name, self.base, self.total);
          if self.total > 0 {
            self.issue(self.base);
            issuing = true;
          }
          self.state = if self.counter < self.total {
            DmaState::Streaming
          } else {
            DmaState::Draining
          };
        }
      },
      DmaState::Streaming => {
        if self.start {
          debug!("[{}] start ignored, transfer in progress", self.name);
        }
        self.issue(self.current_addr);
        issuing = true;
        if self.counter >= self.total {
          self.state = DmaState::Draining;
        }
      },
      DmaState::Draining => {
        if self.start {
          debug!("[{}] start ignored, transfer in progress", self.name);
        }
        if !self.read_wait {
          self.state = DmaState::Idle;
          self.busy = false;
          debug!("[{}] transfer of {} samples done", self.name, self.total);
        }
      },
    }

    self.read_req = self.read_wait;
    self.read_wait = issuing;
  }

  fn reset(&mut self) {
    self.start = false;
    self.base_addr = 0;
    self.num_samples = 0;
    self.mem_data = 0;
    self.mem_addr = 0;
    self.busy = false;
    self.state = DmaState::Idle;
    self.counter = 0;
    self.current_addr = 0;
    self.total = 0;
    self.base = 0;
    self.read_req = false;
    self.read_wait = false;
  }

  fn name(&self) -> &str {
    &self.name
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::builtin::pack_sample;
  use crate::memdomain::SharedMemory;

  /// DMA wired to its own memory port, observed once per cycle
  struct Bench {
    dma: DmaController,
    mem: SharedMemory,
  }

  #[derive(Debug, Default, Clone, Copy)]
  struct Observed {
    busy: bool,
    addr: u32,
    stream: Option<ComplexSample>,
  }

  impl Bench {
    fn new(addr_width: u32) -> Self {
      let mut mem = SharedMemory::new("mem", 64, 1).unwrap();
      for a in 0..64 {
        mem.init_write(a, pack_sample(a as u64, 100 + a as u64, 64));
      }
      Self {
        dma: DmaController::new("dma", addr_width, 64).unwrap(),
        mem,
      }
    }

    fn observe(&self) -> Observed {
      Observed {
        busy: self.dma.busy(),
        addr: self.dma.mem_addr(),
        stream: self.dma.stream_out().get().copied(),
      }
    }

    /// One cycle: observe, then clock with `start` held for this cycle
    fn tick(&mut self, start: Option<(u32, usize)>) -> Observed {
      let seen = self.observe();
      if let Some((base, n)) = start {
        self.dma.start = true;
        self.dma.base_addr = base;
        self.dma.num_samples = n;
      } else {
        self.dma.start = false;
      }
      self.mem.run();
      self.dma.run();
      self.mem.read_addr[0] = self.dma.mem_addr();
      self.dma.mem_data = self.mem.read_data(0);
      seen
    }
  }

  #[test]
  fn test_transfer_timeline() {
    let mut bench = Bench::new(12);
    let mut trace = Vec::new();
    for cycle in 0..18 {
      let start = if cycle == 2 { Some((5, 10)) } else { None };
      trace.push(bench.tick(start));
    }

    assert!(!trace[2].busy);
    assert!(trace[3].busy);
    assert_eq!(trace[3].addr, 5);
    assert_eq!(trace[3].stream, None);

    let valid: Vec<usize> = (0..18).filter(|&c| trace[c].stream.is_some()).collect();
    assert_eq!(valid, (4..14).collect::<Vec<_>>());
    for (i, c) in (4..14).enumerate() {
      let a = 5.0 + i as f64;
      assert_eq!(trace[c].stream, Some(ComplexSample::new(a, 100.0 + a)));
    }

    assert!(trace[13].busy);
    assert!(!trace[14].busy);
    assert_eq!(bench.dma.state(), DmaState::Idle);
    assert_eq!(bench.dma.sample_counter(), 10);
  }

  #[test]
  fn test_zero_samples_pulses_busy_once() {
    let mut bench = Bench::new(12);
    let trace: Vec<Observed> = (0..6)
      .map(|c| bench.tick(if c == 1 { Some((3, 0)) } else { None }))
      .collect();
    let busy: Vec<bool> = trace.iter().map(|o| o.busy).collect();
    assert_eq!(busy, vec![false, false, true, false, false, false]);
    assert!(trace.iter().all(|o| o.stream.is_none()));
  }

  #[test]
  fn test_single_sample() {
    let mut bench = Bench::new(12);
    let trace: Vec<Observed> = (0..6)
      .map(|c| bench.tick(if c == 0 { Some((7, 1)) } else { None }))
      .collect();
    assert_eq!(trace[1].addr, 7);
    assert_eq!(trace[2].stream, Some(ComplexSample::new(7.0, 107.0)));
    assert!(trace[2].busy);
    assert!(!trace[3].busy);
    assert_eq!(trace.iter().filter(|o| o.stream.is_some()).count(), 1);
  }

  #[test]
  fn test_start_while_busy_is_ignored() {
    let mut bench = Bench::new(12);
    let mut trace = Vec::new();
    for cycle in 0..12 {
      let start = match cycle {
        0 => Some((0, 4)),
        2 | 4 => Some((40, 8)),
        _ => None,
      };
      trace.push(bench.tick(start));
    }
    let stream: Vec<f64> = trace.iter().filter_map(|o| o.stream.map(|s| s.re)).collect();
    assert_eq!(stream, vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(bench.dma.latched_base(), 0);
  }

  #[test]
  fn test_back_to_back_transfers() {
    let mut bench = Bench::new(12);
    let mut stream = Vec::new();
    let mut restarted = false;
    for cycle in 0..20 {
      let start = if cycle == 0 {
        Some((10, 3))
      } else if !restarted && cycle > 1 && !bench.dma.busy() {
        restarted = true;
        Some((20, 2))
      } else {
        None
      };
      if let Some(s) = bench.tick(start).stream {
        stream.push(s.re);
      }
    }
    assert_eq!(stream, vec![10.0, 11.0, 12.0, 20.0, 21.0]);
  }

  #[test]
  fn test_address_wraps_at_width() {
    // 3-bit addresses wrap after 7
    let mut bench = Bench::new(3);
    let trace: Vec<Observed> = (0..10)
      .map(|c| bench.tick(if c == 0 { Some((6, 4)) } else { None }))
      .collect();
    let addrs: Vec<u32> = trace[1..5].iter().map(|o| o.addr).collect();
    assert_eq!(addrs, vec![6, 7, 0, 1]);
    let stream: Vec<f64> = trace.iter().filter_map(|o| o.stream.map(|s| s.re)).collect();
    assert_eq!(stream, vec![6.0, 7.0, 0.0, 1.0]);
  }

  #[test]
  fn test_reset_aborts_transfer() {
    let mut bench = Bench::new(12);
    bench.tick(Some((0, 8)));
    bench.tick(None);
    assert!(bench.dma.busy());
    bench.dma.reset();
    assert!(!bench.dma.busy());
    assert_eq!(bench.dma.state(), DmaState::Idle);
    assert!(!bench.dma.stream_out().valid);
    assert_eq!(bench.dma.mem_addr(), 0);
  }

  #[test]
  fn test_rejects_bad_widths() {
    assert!(matches!(DmaController::new("d", 0, 64), Err(ConfigError::InvalidAddrWidth(0))));
    assert!(matches!(DmaController::new("d", 12, 7), Err(ConfigError::InvalidDataWidth(7))));
  }
}
