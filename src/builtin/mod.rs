//! Building blocks shared by every hardware model: the clocked module
//! trait, registered wires and the complex sample type.

pub mod port;
pub mod sample;

pub use port::Wire;
pub use sample::{pack_sample, unpack_word, ComplexSample};

/// A clocked hardware block.
///
/// `run` is one rising clock edge: the module reads only its own registers
/// and the values its parent latched into its input fields, then commits
/// its next state. Parents run every child first and only afterwards copy
/// outputs into inputs, so evaluation order between siblings never matters.
pub trait Module {
  fn run(&mut self);

  /// Synchronous reset back to the power-on state
  fn reset(&mut self);

  fn name(&self) -> &str;
}
