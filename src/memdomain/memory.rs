// Shared sample memory: one write port, one read port per core

use crate::builtin::{Module, Wire};
use crate::error::ConfigError;
use log::{trace, warn};

/// A single-word write request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReq {
  pub addr: u32,
  pub data: u64,
}

/// Word-addressed synchronous memory.
///
/// Reads are registered: the address presented before an edge shows up on
/// `read_data` after it. A read and a write to the same word on one edge
/// return the old contents.
pub struct SharedMemory {
  name: String,
  words: Vec<u64>,

  // Inputs
  pub write_req: Wire<WriteReq>,
  pub read_addr: Vec<u32>,

  // Outputs
  read_data: Vec<u64>,
}

impl SharedMemory {
  pub fn new(name: impl Into<String>, depth: usize, read_ports: usize) -> Result<Self, ConfigError> {
    if depth == 0 {
      return Err(ConfigError::ZeroDepth);
    }
    Ok(Self {
      name: name.into(),
      words: vec![0; depth],
      write_req: Wire::default(),
      read_addr: vec![0; read_ports],
      read_data: vec![0; read_ports],
    })
  }

  pub fn depth(&self) -> usize {
    self.words.len()
  }

  pub fn num_ports(&self) -> usize {
    self.read_data.len()
  }

  /// Registered read result of `port`
  pub fn read_data(&self, port: usize) -> u64 {
    self.read_data.get(port).copied().unwrap_or(0)
  }

  /// Backdoor write used to preload a workload, bypassing the clock.
  /// Returns false when `addr` is outside the memory.
  pub fn init_write(&mut self, addr: usize, data: u64) -> bool {
    match self.words.get_mut(addr) {
      Some(word) => {
        *word = data;
        true
      },
      None => {
        warn!("[{}] preload address {} beyond depth {}", self.name, addr, self.words.len());
        false
      },
    }
  }

  /// Backdoor read, 0 outside the memory
  pub fn read_word(&self, addr: usize) -> u64 {
    self.words.get(addr).copied().unwrap_or(0)
  }
}

impl Module for SharedMemory {
  fn run(&mut self) {
    for (data, &addr) in self.read_data.iter_mut().zip(self.read_addr.iter()) {
      *data = self.words.get(addr as usize).copied().unwrap_or(0);
    }

    if let Some(req) = self.write_req.get() {
      match self.words.get_mut(req.addr as usize) {
        Some(word) => {
          trace!("[{}] mem[{}] <= {:#x}", self.name, req.addr, req.data);
          *word = req.data;
        },
        None => warn!("[{}] dropped write to address {}", self.name, req.addr),
      }
    }
  }

  fn reset(&mut self) {
    self.words.fill(0);
    self.write_req = Wire::default();
    self.read_addr.fill(0);
    self.read_data.fill(0);
  }

  fn name(&self) -> &str {
    &self.name
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rejects_zero_depth() {
    assert!(matches!(SharedMemory::new("m", 0, 1), Err(ConfigError::ZeroDepth)));
  }

  #[test]
  fn test_read_is_registered() {
    let mut mem = SharedMemory::new("m", 8, 2).unwrap();
    mem.init_write(3, 42);
    mem.init_write(5, 7);

    mem.read_addr[0] = 3;
    mem.read_addr[1] = 5;
    assert_eq!(mem.read_data(0), 0);
    mem.run();
    assert_eq!(mem.read_data(0), 42);
    assert_eq!(mem.read_data(1), 7);
  }

  #[test]
  fn test_read_before_write_on_same_edge() {
    let mut mem = SharedMemory::new("m", 4, 1).unwrap();
    mem.init_write(1, 10);
    mem.read_addr[0] = 1;
    mem.write_req = Wire::asserted(WriteReq { addr: 1, data: 20 });
    mem.run();
    assert_eq!(mem.read_data(0), 10);
    assert_eq!(mem.read_word(1), 20);

    mem.write_req.clear();
    mem.run();
    assert_eq!(mem.read_data(0), 20);
  }

  #[test]
  fn test_out_of_range_access() {
    let mut mem = SharedMemory::new("m", 4, 1).unwrap();
    assert!(!mem.init_write(4, 1));
    mem.read_addr[0] = 100;
    mem.write_req = Wire::asserted(WriteReq { addr: 9, data: 5 });
    mem.run();
    assert_eq!(mem.read_data(0), 0);
    assert!((0..4).all(|a| mem.read_word(a) == 0));
    assert_eq!(mem.read_word(9), 0);
  }

  #[test]
  fn test_reset_clears_contents() {
    let mut mem = SharedMemory::new("m", 4, 1).unwrap();
    mem.init_write(2, 99);
    mem.read_addr[0] = 2;
    mem.run();
    mem.reset();
    assert_eq!(mem.read_word(2), 0);
    assert_eq!(mem.read_data(0), 0);
    assert_eq!(mem.num_ports(), 1);
    assert_eq!(mem.depth(), 4);
  }
}
