//! Hardware configuration of the interleaved FFT system

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FftConfig {
  /// Points per transform, a power of two >= 2
  pub n_points: usize,
  /// Number of DMA + FFT core pairs
  pub num_cores: usize,
  /// Cycles between consecutive core start pulses
  pub hop_size: usize,
  /// Shared memory depth in words
  pub mem_depth: usize,
  /// Memory word width; each half carries one component
  pub data_width: u32,
  /// DMA address register width
  pub addr_width: u32,
}

impl FftConfig {
  pub fn new(n_points: usize, num_cores: usize, hop_size: usize) -> Self {
    Self {
      n_points,
      num_cores,
      hop_size,
      ..Self::default()
    }
  }

  pub fn with_memory(mut self, mem_depth: usize, data_width: u32, addr_width: u32) -> Self {
    self.mem_depth = mem_depth;
    self.data_width = data_width;
    self.addr_width = addr_width;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    validate_fft_size(self.n_points)?;
    validate_stagger(self.num_cores, self.hop_size)?;
    if self.mem_depth == 0 {
      return Err(ConfigError::ZeroDepth);
    }
    if self.data_width < 2 || self.data_width > 64 || self.data_width % 2 != 0 {
      return Err(ConfigError::InvalidDataWidth(self.data_width));
    }
    if self.addr_width == 0 || self.addr_width > 32 {
      return Err(ConfigError::InvalidAddrWidth(self.addr_width));
    }
    Ok(())
  }

  /// Number of butterfly stages, log2(N)
  pub fn num_stages(&self) -> u32 {
    self.n_points.trailing_zeros()
  }

  pub fn addr_mask(&self) -> u32 {
    addr_mask(self.addr_width)
  }
}

impl Default for FftConfig {
  fn default() -> Self {
    Self {
      n_points: 4,
      num_cores: 2,
      hop_size: 1,
      mem_depth: 2048,
      data_width: 64,
      addr_width: 12,
    }
  }
}

pub(crate) fn validate_fft_size(n_points: usize) -> Result<(), ConfigError> {
  if n_points < 2 || !n_points.is_power_of_two() {
    return Err(ConfigError::InvalidFftSize(n_points));
  }
  Ok(())
}

pub(crate) fn validate_stagger(num_cores: usize, hop_size: usize) -> Result<(), ConfigError> {
  if num_cores == 0 {
    return Err(ConfigError::NoCores);
  }
  if hop_size == 0 {
    return Err(ConfigError::ZeroHop);
  }
  Ok(())
}

pub(crate) fn addr_mask(addr_width: u32) -> u32 {
  if addr_width >= 32 {
    u32::MAX
  } else {
    (1u32 << addr_width) - 1
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_is_valid() {
    let config = FftConfig::default();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.num_stages(), 2);
    assert_eq!(config.addr_mask(), 0xfff);
  }

  #[test]
  fn test_rejects_bad_fft_sizes() {
    for n in [0, 1, 3, 6, 12, 1000] {
      assert_eq!(
        FftConfig::new(n, 1, 1).validate(),
        Err(ConfigError::InvalidFftSize(n))
      );
    }
  }

  #[test]
  fn test_rejects_zero_cores_and_hop() {
    assert_eq!(FftConfig::new(8, 0, 1).validate(), Err(ConfigError::NoCores));
    assert_eq!(FftConfig::new(8, 2, 0).validate(), Err(ConfigError::ZeroHop));
  }

  #[test]
  fn test_rejects_bad_memory_shape() {
    let base = FftConfig::new(8, 2, 1);
    assert_eq!(base.clone().with_memory(0, 64, 12).validate(), Err(ConfigError::ZeroDepth));
    assert_eq!(
      base.clone().with_memory(16, 33, 12).validate(),
      Err(ConfigError::InvalidDataWidth(33))
    );
    assert_eq!(
      base.clone().with_memory(16, 64, 0).validate(),
      Err(ConfigError::InvalidAddrWidth(0))
    );
    assert_eq!(base.with_memory(16, 64, 32).addr_mask(), u32::MAX);
  }
}
