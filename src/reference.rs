//! Golden models used to check and present pipeline results.

use crate::builtin::ComplexSample;
use std::f64::consts::PI;

/// Reverse the low `bits` bits of `index`
pub fn bit_reverse(index: usize, bits: u32) -> usize {
  if bits == 0 {
    return 0;
  }
  index.reverse_bits() >> (usize::BITS - bits)
}

/// Direct O(N^2) discrete Fourier transform in natural bin order
pub fn dft(input: &[ComplexSample]) -> Vec<ComplexSample> {
  let n = input.len();
  (0..n)
    .map(|k| {
      input
        .iter()
        .enumerate()
        .map(|(t, x)| {
          let angle = -2.0 * PI * ((k * t) % n) as f64 / n as f64;
          x * ComplexSample::from_polar(1.0, angle)
        })
        .sum()
    })
    .collect()
}
