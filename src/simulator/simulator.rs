use super::config::AppConfig;
use super::sim::mode::{SimConfig, StepMode};
use super::sim::records::OutputCollector;
use super::sim::shell::{Command, Shell};
use super::sim::trace::TraceWriter;
use super::utils::report::print_report;
use crate::error::SimError;
use crate::log_info;
use crate::simulator::config::FillPattern;
use crate::top::InterleavedFft;
use log::{debug, info};

pub struct Simulator {
  config: SimConfig,
  pattern: FillPattern,
  fill_len: usize,
  top: InterleavedFft,
  collector: OutputCollector,
  trace: Option<TraceWriter>,
}

impl Simulator {
  /// Build the system, preload memory and set per-core transfers
  pub fn from_app_config(app: &AppConfig) -> Result<Self, SimError> {
    let mut top = InterleavedFft::new(app.hardware())?;
    for core in 0..top.num_cores() {
      let (base, samples) = app.core_transfer(core);
      top.set_core_transfer(core, base, samples)?;
    }

    let config = SimConfig::from_app_config(app);
    let trace = match &config.trace_file {
      Some(path) => Some(TraceWriter::create(path)?),
      None => None,
    };

    let mut simulator = Self {
      config,
      pattern: app.workload.pattern,
      fill_len: app.fill_len(),
      top,
      collector: OutputCollector::new(),
      trace,
    };
    simulator.preload();
    Ok(simulator)
  }

  pub fn top(&self) -> &InterleavedFft {
    &self.top
  }

  pub fn top_mut(&mut self) -> &mut InterleavedFft {
    &mut self.top
  }

  pub fn collector(&self) -> &OutputCollector {
    &self.collector
  }

  /// Write the workload pattern into memory through the backdoor
  pub fn preload(&mut self) {
    let n = self.top.config().n_points;
    let width = self.top.config().data_width;
    let words: Vec<u64> = (0..self.fill_len).map(|a| self.pattern.word(a, n, width)).collect();
    let written = self.top.preload(0, &words);
    debug!("preloaded {} of {} words ({:?})", written, words.len(), self.pattern);
  }

  /// One clock edge, collecting and tracing the outputs it produces
  pub fn step(&mut self) -> Result<(), SimError> {
    self.top.tick();
    let fresh = self.collector.observe(&self.top);
    if let Some(trace) = self.trace.as_mut() {
      for record in fresh {
        trace.write(record)?;
      }
    }
    Ok(())
  }

  /// Tick until the system is idle. Returns the cycles spent.
  pub fn run_until_idle(&mut self) -> Result<u64, SimError> {
    let mut spent = 0;
    while !self.top.is_idle() {
      if spent >= self.config.max_cycles {
        return Err(SimError::Timeout {
          cycles: self.config.max_cycles,
        });
      }
      self.step()?;
      spent += 1;
    }
    Ok(spent)
  }

  pub fn run(&mut self) -> Result<(), SimError> {
    match self.config.step_mode {
      StepMode::Continuous => self.run_continuous()?,
      StepMode::Step => self.run_step_mode()?,
    }
    if let Some(trace) = self.trace.as_mut() {
      trace.flush()?;
      info!("wrote {} trace records", trace.written());
    }
    if !self.config.quiet {
      print_report(&self.top, &self.collector);
    }
    Ok(())
  }

  fn run_continuous(&mut self) -> Result<(), SimError> {
    log_info!("Continuous mode, {} run(s)", self.config.runs);
    for run in 0..self.config.runs {
      self.top.pulse_start();
      let cycles = self.run_until_idle()?;
      log_info!("run {} done in {} cycles (cycle {})", run, cycles, self.top.cycle());
    }
    Ok(())
  }

  fn run_step_mode(&mut self) -> Result<(), SimError> {
    log_info!("Step mode - {}", Shell::help());
    let mut shell = Shell::new()?;
    loop {
      match shell.read_command()? {
        Command::Step(n) => {
          for _ in 0..n {
            self.step()?;
          }
        },
        Command::Start => {
          self.top.pulse_start();
          self.step()?;
        },
        Command::Reset => {
          self.top.pulse_reset();
          self.step()?;
          self.preload();
        },
        Command::Continue => {
          self.run_until_idle()?;
        },
        Command::Quit => break,
      }
      self.print_status();
    }
    Ok(())
  }

  fn print_status(&self) {
    let cores: Vec<String> = (0..self.top.num_cores())
      .map(|i| {
        let out = self.top.output(i);
        let out = match out.get() {
          Some(s) => format!("X[{}]={:.3}", s.index, s.value),
          None => "-".to_string(),
        };
        format!(
          "core{} dma={} fft={} {}",
          i,
          if self.top.dma_busy(i) { "busy" } else { "idle" },
          if self.top.core_status(i) { "on" } else { "off" },
          out
        )
      })
      .collect();
    println!("cycle {:>6} | {}", self.top.cycle(), cores.join(" | "));
  }
}
