use super::records::OutputRecord;
use crate::error::SimError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON-lines trace, one output record per line
pub struct TraceWriter<W: Write = BufWriter<File>> {
  out: W,
  written: usize,
}

impl TraceWriter {
  pub fn create(path: impl AsRef<Path>) -> Result<Self, SimError> {
    Ok(Self::new(BufWriter::new(File::create(path)?)))
  }
}

impl<W: Write> TraceWriter<W> {
  pub fn new(out: W) -> Self {
    Self { out, written: 0 }
  }

  pub fn write(&mut self, record: &OutputRecord) -> Result<(), SimError> {
    serde_json::to_writer(&mut self.out, record)?;
    self.out.write_all(b"\n")?;
    self.written += 1;
    Ok(())
  }

  pub fn written(&self) -> usize {
    self.written
  }

  pub fn flush(&mut self) -> Result<(), SimError> {
    self.out.flush()?;
    Ok(())
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}
