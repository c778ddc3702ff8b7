// Mem Domain: shared sample memory and the per-core streaming DMAs

pub mod dma;
pub mod memory;

pub use dma::{DmaController, DmaState};
pub use memory::{SharedMemory, WriteReq};
