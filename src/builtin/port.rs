//! Port and signal types for module interconnection

/// A registered signal carrying a value plus its valid flag.
///
/// Every wire between two modules is written by exactly one module and
/// latched into the reader's input field by the parent once per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wire<T: Clone> {
  pub value: T,
  pub valid: bool,
}

impl<T: Clone> Wire<T> {
  pub fn new(value: T) -> Self {
    Self { value, valid: false }
  }

  /// Drive a valid value onto the wire
  pub fn set(&mut self, value: T) {
    self.value = value;
    self.valid = true;
  }

  pub fn clear(&mut self) {
    self.valid = false;
  }

  /// The carried value, only when valid
  pub fn get(&self) -> Option<&T> {
    if self.valid {
      Some(&self.value)
    } else {
      None
    }
  }
}

impl<T: Clone + Default> Wire<T> {
  /// An asserted wire
  pub fn asserted(value: T) -> Self {
    Self { value, valid: true }
  }

  /// A deasserted wire holding the default value
  pub fn idle() -> Self {
    Self::default()
  }
}

impl<T: Clone + Default> Default for Wire<T> {
  fn default() -> Self {
    Self {
      value: T::default(),
      valid: false,
    }
  }
}
