/// Fixed-length shift register of valid bits, stored as a ring.
///
/// Position 0 is the newest bit, `len - 1` the oldest. Shifting moves the
/// head pointer instead of every bit; a running count keeps `any` O(1).
#[derive(Debug, Clone)]
pub struct ValidPipe {
  bits: Vec<bool>,
  head: usize,
  ones: usize,
}

impl ValidPipe {
  pub fn new(len: usize) -> Self {
    Self {
      bits: vec![false; len],
      head: 0,
      ones: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.bits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bits.is_empty()
  }

  /// Bit at `pos` slots behind the head
  pub fn get(&self, pos: usize) -> bool {
    if pos >= self.bits.len() {
      return false;
    }
    self.bits[(self.head + pos) % self.bits.len()]
  }

  /// Oldest bit, the one leaving the pipe on the next shift
  pub fn last(&self) -> bool {
    match self.bits.len() {
      0 => false,
      len => self.get(len - 1),
    }
  }

  pub fn any(&self) -> bool {
    self.ones > 0
  }

  /// Shift every bit one slot older and insert `bit` at the head
  pub fn shift_in(&mut self, bit: bool) {
    let len = self.bits.len();
    if len == 0 {
      return;
    }
    // the slot before the head holds the oldest bit, which falls off
    self.head = (self.head + len - 1) % len;
    if self.bits[self.head] {
      self.ones -= 1;
    }
    self.bits[self.head] = bit;
    if bit {
      self.ones += 1;
    }
  }

  pub fn clear(&mut self) {
    self.bits.fill(false);
    self.head = 0;
    self.ones = 0;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bit_travels_to_the_end() {
    let mut pipe = ValidPipe::new(3);
    assert!(!pipe.any());

    pipe.shift_in(true);
    assert!(pipe.get(0));
    assert!(!pipe.last());

    pipe.shift_in(false);
    pipe.shift_in(false);
    assert!(pipe.last());
    assert!(pipe.get(2));
    assert!(pipe.any());

    pipe.shift_in(false);
    assert!(!pipe.any());
    assert!(!pipe.last());
  }

  #[test]
  fn test_count_tracks_pattern() {
    let mut pipe = ValidPipe::new(4);
    let pattern = [true, true, false, true, false, false, false, false];
    let mut history: Vec<bool> = Vec::new();
    for &bit in &pattern {
      pipe.shift_in(bit);
      history.insert(0, bit);
      history.truncate(4);
      let expected: Vec<bool> = (0..4).map(|i| history.get(i).copied().unwrap_or(false)).collect();
      let actual: Vec<bool> = (0..4).map(|i| pipe.get(i)).collect();
      assert_eq!(actual, expected);
      assert_eq!(pipe.any(), expected.iter().any(|b| *b));
    }
  }

  #[test]
  fn test_clear() {
    let mut pipe = ValidPipe::new(2);
    pipe.shift_in(true);
    pipe.shift_in(true);
    pipe.clear();
    assert!(!pipe.any());
    assert!(!pipe.get(0) && !pipe.get(1));
    assert!(!pipe.get(5));
  }
}
