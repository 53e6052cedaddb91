//! Label output.

use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Output format for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One label per line (default).
    #[default]
    Lines,
    /// A single JSON array.
    Json,
}

/// Output configuration.
pub struct Output {
    pub format: OutputFormat,
    pub file: Option<String>,
}

impl Output {
    pub fn new(format: OutputFormat, file: Option<String>) -> Self {
        Self { format, file }
    }

    /// Writes the labels to the configured file, or stdout.
    pub fn write(&self, labels: &[i32]) -> anyhow::Result<()> {
        match &self.file {
            Some(path) => {
                let mut w = BufWriter::new(File::create(path)?);
                self.render(labels, &mut w)?;
                w.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut w = stdout.lock();
                self.render(labels, &mut w)?;
                w.flush()?;
            }
        }
        Ok(())
    }

    fn render<W: Write>(&self, labels: &[i32], w: &mut W) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *w, labels)?;
                writeln!(w)?;
            }
            OutputFormat::Lines => {
                for label in labels {
                    writeln!(w, "{label}")?;
                }
            }
        }
        Ok(())
    }
}
