use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::figure::Figure;
use crate::graph;
use crate::{OutputFormat, RenderOptions};

/// Destination for a finished figure
pub trait Present {
    fn present(&mut self, figure: &Figure) -> Result<()>;
}

/// Renders figures into an image format and writes the bytes out
pub struct ImageWriter<W: Write> {
    writer: W,
    options: RenderOptions,
}

impl<W: Write> ImageWriter<W> {
    pub fn new(writer: W, options: RenderOptions) -> Self {
        Self { writer, options }
    }

    pub fn format(&self) -> OutputFormat {
        self.options.format
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Present for ImageWriter<W> {
    fn present(&mut self, figure: &Figure) -> Result<()> {
        let bytes = graph::render(figure, &self.options)?;
        self.writer
            .write_all(&bytes)
            .context("Failed to write rendered figure")?;
        self.writer.flush().context("Failed to flush output")?;
        info!(
            bytes = bytes.len(),
            format = ?self.options.format,
            panels = figure.axes().len(),
            "presented figure"
        );
        Ok(())
    }
}
