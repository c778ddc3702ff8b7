// FFT Domain: streaming radix-2 DIF pipeline

pub mod pipeline;
pub mod stage;
pub mod valid_pipe;

pub use pipeline::{FftPipeline, FftSample};
pub use stage::{ButterflyStage, Phase, StageConfig, StageControl};
pub use valid_pipe::ValidPipe;
