pub mod mode;
pub mod records;
pub mod shell;
pub mod trace;

pub use mode::{SimConfig, StepMode};
pub use records::{OutputCollector, OutputRecord};
pub use trace::TraceWriter;
