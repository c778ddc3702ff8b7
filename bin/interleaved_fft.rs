use clap::Parser;
use interleaved_fft::simulator::config::{load_and_merge_configs, CliOverrides};
use interleaved_fft::simulator::utils::log::init_log;
use interleaved_fft::simulator::Simulator;
use interleaved_fft::SimError;
use std::path::PathBuf;
use std::process::ExitCode;

/// Cycle-accurate interleaved FFT accelerator simulator
#[derive(Parser, Debug)]
#[command(name = "interleaved-fft")]
#[command(version = "0.1.0")]
#[command(about = "Multi-core pipelined DIF FFT simulator", long_about = None)]
struct Args {
  /// TOML configuration merged over the built-in defaults
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Enable step mode (interactive stepping)
  #[arg(short, long)]
  step: bool,

  /// Quiet mode (suppress log messages and the report)
  #[arg(short, long)]
  quiet: bool,

  /// Output trace file path (JSON lines)
  #[arg(long, value_name = "FILE")]
  trace_file: Option<String>,

  /// FFT size per core
  #[arg(short = 'n', long, value_name = "N")]
  points: Option<usize>,

  /// Number of DMA + FFT cores
  #[arg(long)]
  cores: Option<usize>,

  /// Cycles between core start pulses
  #[arg(long)]
  hop: Option<usize>,

  /// Global starts issued in continuous mode
  #[arg(long)]
  runs: Option<u32>,
}

fn run(args: Args) -> Result<(), SimError> {
  let cli = CliOverrides {
    quiet: args.quiet,
    step: args.step,
    trace_file: args.trace_file,
    n_points: args.points,
    num_cores: args.cores,
    hop_size: args.hop,
    runs: args.runs,
  };
  let config = load_and_merge_configs(args.config.as_deref(), &cli)?;
  init_log(config.simulation.quiet);

  let mut simulator = Simulator::from_app_config(&config)?;
  simulator.run()
}

fn main() -> ExitCode {
  let args = Args::parse();
  match run(args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      init_log(false);
      log::error!("{}", e);
      ExitCode::FAILURE
    },
  }
}
