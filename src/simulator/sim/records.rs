use crate::builtin::ComplexSample;
use crate::top::InterleavedFft;
use serde::{Deserialize, Serialize};

/// One valid FFT output as seen on a core's output port
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
  pub cycle: u64,
  pub core: usize,
  /// Frequency bin
  pub index: usize,
  pub re: f64,
  pub im: f64,
}

impl OutputRecord {
  pub fn value(&self) -> ComplexSample {
    ComplexSample::new(self.re, self.im)
  }
}

/// Accumulates every valid output of a run
#[derive(Debug, Default)]
pub struct OutputCollector {
  records: Vec<OutputRecord>,
}

impl OutputCollector {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record the outputs presented in the current cycle. Returns the new
  /// records.
  pub fn observe(&mut self, top: &InterleavedFft) -> &[OutputRecord] {
    let start = self.records.len();
    for (core, out) in top.outputs().iter().enumerate() {
      if let Some(sample) = out.get() {
        self.records.push(OutputRecord {
          cycle: top.cycle(),
          core,
          index: sample.index,
          re: sample.value.re,
          im: sample.value.im,
        });
      }
    }
    &self.records[start..]
  }

  pub fn records(&self) -> &[OutputRecord] {
    &self.records
  }

  pub fn for_core(&self, core: usize) -> impl Iterator<Item = &OutputRecord> + '_ {
    self.records.iter().filter(move |r| r.core == core)
  }

  pub fn count(&self, core: usize) -> usize {
    self.for_core(core).count()
  }

  pub fn first_output_cycle(&self, core: usize) -> Option<u64> {
    self.for_core(core).map(|r| r.cycle).next()
  }

  /// The `block`-th complete block of `n_points` outputs from `core`,
  /// placed in natural bin order
  pub fn block(&self, core: usize, block: usize, n_points: usize) -> Option<Vec<ComplexSample>> {
    let records: Vec<&OutputRecord> = self.for_core(core).skip(block * n_points).take(n_points).collect();
    if records.len() < n_points {
      return None;
    }
    let mut natural = vec![ComplexSample::default(); n_points];
    for record in records {
      if let Some(slot) = natural.get_mut(record.index) {
        *slot = record.value();
      }
    }
    Some(natural)
  }

  pub fn clear(&mut self) {
    self.records.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(cycle: u64, core: usize, index: usize, re: f64) -> OutputRecord {
    OutputRecord {
      cycle,
      core,
      index,
      re,
      im: 0.0,
    }
  }

  #[test]
  fn test_block_is_placed_in_bin_order() {
    let mut collector = OutputCollector::new();
    for (i, index) in [0, 2, 1, 3].iter().enumerate() {
      collector.records.push(record(10 + i as u64, 1, *index, *index as f64 * 10.0));
      collector.records.push(record(10 + i as u64, 0, *index, -1.0));
    }

    let block = collector.block(1, 0, 4).unwrap();
    let re: Vec<f64> = block.iter().map(|c| c.re).collect();
    assert_eq!(re, vec![0.0, 10.0, 20.0, 30.0]);
    assert_eq!(collector.count(1), 4);
    assert_eq!(collector.first_output_cycle(1), Some(10));
    assert_eq!(collector.block(1, 1, 4), None);
    assert_eq!(collector.first_output_cycle(2), None);
  }

  #[test]
  fn test_record_serializes_as_flat_json() {
    let json = serde_json::to_string(&record(7, 1, 3, 2.5)).unwrap();
    assert_eq!(json, r#"{"cycle":7,"core":1,"index":3,"re":2.5,"im":0.0}"#);
  }
}
