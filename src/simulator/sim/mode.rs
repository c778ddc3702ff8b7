use crate::simulator::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
  Continuous,
  Step,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
  pub quiet: bool,
  pub step_mode: StepMode,
  pub trace_file: Option<String>,
  /// Cycle budget for one run to go idle
  pub max_cycles: u64,
  /// Global starts issued in continuous mode
  pub runs: u32,
}

impl SimConfig {
  pub fn from_app_config(config: &AppConfig) -> Self {
    let step_mode = if config.simulation.step_mode {
      StepMode::Step
    } else {
      StepMode::Continuous
    };
    let trace_file = match config.simulation.trace_file.trim() {
      "" => None,
      path => Some(path.to_string()),
    };
    Self {
      quiet: config.simulation.quiet,
      step_mode,
      trace_file,
      max_cycles: config.workload.max_cycles,
      runs: config.workload.runs,
    }
  }
}
