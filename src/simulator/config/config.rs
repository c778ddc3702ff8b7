use crate::builtin::pack_sample;
use crate::config::FftConfig;
use crate::error::{ConfigError, SimError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Embedded defaults, every user file is merged over these
const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// Memory contents written before the first start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPattern {
  /// word `a` holds `a + 0j`
  #[default]
  Ramp,
  /// `1 + 0j` at the start of every `n_points` block, zero elsewhere
  Impulse,
  /// `1 + 0j` everywhere
  Dc,
}

impl FillPattern {
  pub fn word(&self, addr: usize, n_points: usize, data_width: u32) -> u64 {
    match self {
      FillPattern::Ramp => pack_sample(addr as u64, 0, data_width),
      FillPattern::Impulse if addr % n_points == 0 => pack_sample(1, 0, data_width),
      FillPattern::Impulse => 0,
      FillPattern::Dc => pack_sample(1, 0, data_width),
    }
  }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FftSection {
  pub n_points: usize,
  pub num_cores: usize,
  pub hop_size: usize,
}

impl Default for FftSection {
  fn default() -> Self {
    let hw = FftConfig::default();
    Self {
      n_points: hw.n_points,
      num_cores: hw.num_cores,
      hop_size: hw.hop_size,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemorySection {
  pub depth: usize,
  pub data_width: u32,
  pub addr_width: u32,
}

impl Default for MemorySection {
  fn default() -> Self {
    let hw = FftConfig::default();
    Self {
      depth: hw.mem_depth,
      data_width: hw.data_width,
      addr_width: hw.addr_width,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkloadSection {
  #[serde(default)]
  pub pattern: FillPattern,
  #[serde(default)]
  pub fill_len: usize,
  #[serde(default)]
  pub base_addrs: Vec<u32>,
  #[serde(default)]
  pub num_samples: Vec<usize>,
  #[serde(default = "default_max_cycles")]
  pub max_cycles: u64,
  #[serde(default = "default_runs")]
  pub runs: u32,
}

fn default_max_cycles() -> u64 {
  10_000
}

fn default_runs() -> u32 {
  1
}

impl Default for WorkloadSection {
  fn default() -> Self {
    Self {
      pattern: FillPattern::default(),
      fill_len: 0,
      base_addrs: Vec::new(),
      num_samples: Vec::new(),
      max_cycles: default_max_cycles(),
      runs: default_runs(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulationSection {
  #[serde(default)]
  pub quiet: bool,
  #[serde(default)]
  pub step_mode: bool,
  #[serde(default)]
  pub trace_file: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
  #[serde(default)]
  pub fft: FftSection,
  #[serde(default)]
  pub memory: MemorySection,
  #[serde(default)]
  pub workload: WorkloadSection,
  #[serde(default)]
  pub simulation: SimulationSection,
}

impl AppConfig {
  /// Hardware parameters for `InterleavedFft::new`
  pub fn hardware(&self) -> FftConfig {
    FftConfig::new(self.fft.n_points, self.fft.num_cores, self.fft.hop_size).with_memory(
      self.memory.depth,
      self.memory.data_width,
      self.memory.addr_width,
    )
  }

  /// Words to preload, `num_cores * n_points` unless set
  pub fn fill_len(&self) -> usize {
    match self.workload.fill_len {
      0 => self.fft.num_cores * self.fft.n_points,
      len => len,
    }
  }

  /// Transfer of core `core`, defaulting to block `core`
  pub fn core_transfer(&self, core: usize) -> (u32, usize) {
    let base = self
      .workload
      .base_addrs
      .get(core)
      .copied()
      .unwrap_or((core * self.fft.n_points) as u32);
    let samples = self
      .workload
      .num_samples
      .get(core)
      .copied()
      .unwrap_or(self.fft.n_points);
    (base, samples)
  }
}

/// Command line values that win over every file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
  pub quiet: bool,
  pub step: bool,
  pub trace_file: Option<String>,
  pub n_points: Option<usize>,
  pub num_cores: Option<usize>,
  pub hop_size: Option<usize>,
  pub runs: Option<u32>,
}

pub fn load_default_config() -> Result<AppConfig, SimError> {
  Ok(toml::from_str(DEFAULT_CONFIG)?)
}

/// Defaults with `overlay` (TOML text) merged on top. Tables merge key by
/// key, any other value replaces the default.
pub fn merge_config_str(overlay: &str) -> Result<AppConfig, SimError> {
  let mut merged: toml::Value = toml::from_str(DEFAULT_CONFIG)?;
  let overlay: toml::Value = toml::from_str(overlay)?;
  merge_values(&mut merged, overlay);
  Ok(merged.try_into()?)
}

fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
  match (base, overlay) {
    (toml::Value::Table(base), toml::Value::Table(overlay)) => {
      for (key, value) in overlay {
        match base.get_mut(&key) {
          Some(slot) => merge_values(slot, value),
          None => {
            base.insert(key, value);
          },
        }
      }
    },
    (slot, value) => *slot = value,
  }
}

pub fn apply_cli_overrides(config: &mut AppConfig, cli: &CliOverrides) {
  if cli.quiet {
    config.simulation.quiet = true;
  }
  if cli.step {
    config.simulation.step_mode = true;
  }
  if let Some(file) = &cli.trace_file {
    config.simulation.trace_file = file.clone();
  }
  if let Some(n) = cli.n_points {
    config.fft.n_points = n;
  }
  if let Some(cores) = cli.num_cores {
    config.fft.num_cores = cores;
  }
  if let Some(hop) = cli.hop_size {
    config.fft.hop_size = hop;
  }
  if let Some(runs) = cli.runs {
    config.workload.runs = runs;
  }
}

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
  config.hardware().validate()?;

  let cores = config.fft.num_cores;
  for (field, got) in [
    ("base_addrs", config.workload.base_addrs.len()),
    ("num_samples", config.workload.num_samples.len()),
  ] {
    if got != 0 && got != cores {
      return Err(ConfigError::PerCoreLength { field, got, cores });
    }
  }

  if config.workload.max_cycles == 0 {
    return Err(ConfigError::ZeroCycleBudget);
  }
  Ok(())
}

/// Load and merge configuration
///
/// 1. embedded defaults
/// 2. the user file, if given
/// 3. command line overrides
/// 4. validation
pub fn load_and_merge_configs(custom_config_path: Option<&Path>, cli: &CliOverrides) -> Result<AppConfig, SimError> {
  let mut config = match custom_config_path {
    Some(path) => merge_config_str(&fs::read_to_string(path)?)?,
    None => load_default_config()?,
  };
  apply_cli_overrides(&mut config, cli);
  validate_config(&config)?;
  Ok(config)
}
