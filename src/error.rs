use thiserror::Error;

/// Rejected hardware or workload configuration.
///
/// Only raised while building a model; a constructed model never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("FFT size must be a power of two >= 2, got {0}")]
  InvalidFftSize(usize),

  #[error("number of cores must be at least 1")]
  NoCores,

  #[error("hop size must be at least 1 cycle")]
  ZeroHop,

  #[error("memory depth must be at least 1 word")]
  ZeroDepth,

  #[error("data width must be an even number of bits in 2..=64, got {0}")]
  InvalidDataWidth(u32),

  #[error("address width must be in 1..=32 bits, got {0}")]
  InvalidAddrWidth(u32),

  #[error("{field} lists {got} entries but there are {cores} cores")]
  PerCoreLength {
    field: &'static str,
    got: usize,
    cores: usize,
  },

  #[error("core index {index} out of range for {cores} cores")]
  NoSuchCore { index: usize, cores: usize },

  #[error("cycle budget must be at least 1")]
  ZeroCycleBudget,
}

/// Failures of the simulator front end
#[derive(Debug, Error)]
pub enum SimError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse TOML configuration: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error("interactive shell error: {0}")]
  Readline(#[from] rustyline::error::ReadlineError),

  #[error("failed to encode trace record: {0}")]
  Trace(#[from] serde_json::Error),

  #[error("system did not go idle within {cycles} cycles")]
  Timeout { cycles: u64 },
}
