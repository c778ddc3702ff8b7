use crate::simulator::sim::records::OutputCollector;
use crate::top::InterleavedFft;

/// Per-core summary lines: output count, first output cycle and the first
/// block in natural bin order
pub fn report_lines(top: &InterleavedFft, collector: &OutputCollector) -> Vec<String> {
  let n = top.config().n_points;
  let mut lines = vec![format!(
    "{} cores, N = {}, hop = {}, latency = {} cycles, {} cycles simulated",
    top.num_cores(),
    n,
    top.config().hop_size,
    top.latency(),
    top.cycle()
  )];

  for core in 0..top.num_cores() {
    let first = match collector.first_output_cycle(core) {
      Some(cycle) => format!("first output @ cycle {}", cycle),
      None => "no output".to_string(),
    };
    lines.push(format!("[core {}] {} valid outputs, {}", core, collector.count(core), first));

    if let Some(block) = collector.block(core, 0, n) {
      for (bin, value) in block.iter().enumerate() {
        lines.push(format!("  X[{:>3}] = {:>12.4} {:+12.4}j", bin, value.re, value.im));
      }
    }
  }
  lines
}

pub fn print_report(top: &InterleavedFft, collector: &OutputCollector) {
  println!("\n--- Simulation Report ---");
  for line in report_lines(top, collector) {
    println!("{}", line);
  }
  println!("--- End Report ---\n");
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::FftConfig;

  #[test]
  fn test_report_for_idle_system() {
    let top = InterleavedFft::new(FftConfig::new(4, 2, 1)).unwrap();
    let lines = report_lines(&top, &OutputCollector::new());
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("latency = 5 cycles"));
    assert_eq!(lines[2], "[core 1] 0 valid outputs, no output");
  }
}
