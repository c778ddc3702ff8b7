use num_complex::Complex64;

/// One complex data sample flowing through the datapath
pub type ComplexSample = Complex64;

fn half_mask(data_width: u32) -> (u32, u64) {
  let half = data_width / 2;
  let mask = if half >= 64 { u64::MAX } else { (1u64 << half) - 1 };
  (half, mask)
}

/// Pack two unsigned halves into one memory word: real in the high half,
/// imaginary in the low half. Bits beyond `data_width / 2` per half drop.
pub fn pack_sample(re: u64, im: u64, data_width: u32) -> u64 {
  let (half, mask) = half_mask(data_width);
  ((re & mask) << half) | (im & mask)
}

/// Split a memory word into a complex sample, both halves unsigned
pub fn unpack_word(word: u64, data_width: u32) -> ComplexSample {
  let (half, mask) = half_mask(data_width);
  let re = (word >> half) & mask;
  let im = word & mask;
  ComplexSample::new(re as f64, im as f64)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unpack_64_bit_word() {
    let word = (7u64 << 32) | 3;
    assert_eq!(unpack_word(word, 64), ComplexSample::new(7.0, 3.0));
    assert_eq!(pack_sample(7, 3, 64), word);
  }

  #[test]
  fn test_narrow_word_truncates_halves() {
    // 16-bit words hold two 8-bit halves
    let word = pack_sample(0x1ff, 0x102, 16);
    assert_eq!(word, 0xff02);
    assert_eq!(unpack_word(word, 16), ComplexSample::new(255.0, 2.0));
  }

  #[test]
  fn test_unpack_ignores_bits_above_width() {
    let word = 0xdead_0000_0000_0000 | pack_sample(1, 2, 32);
    assert_eq!(unpack_word(word, 32), ComplexSample::new(1.0, 2.0));
  }
}
