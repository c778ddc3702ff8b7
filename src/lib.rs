//! Cycle-accurate model of a multi-core pipelined DIF FFT accelerator.
//!
//! `NUM_CORES` DMA + FFT pairs share one multi-port memory. A scheduler
//! staggers their start pulses by `HOP_SIZE` cycles, each DMA streams one
//! block of words into its core, and each core emits the transform in
//! bit-reversed bin order.

pub mod builtin;
pub mod config;
pub mod error;
pub mod fftdomain;
pub mod memdomain;
pub mod reference;
pub mod scheduler;
pub mod simulator;
pub mod top;

pub use builtin::{ComplexSample, Module, Wire};
pub use config::FftConfig;
pub use error::{ConfigError, SimError};
pub use fftdomain::{ButterflyStage, FftPipeline, FftSample, StageConfig};
pub use memdomain::{DmaController, DmaState, SharedMemory, WriteReq};
pub use scheduler::InterleavedScheduler;
pub use top::InterleavedFft;
