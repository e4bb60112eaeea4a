// Library exports for countplot

pub mod color;
pub mod counts;
pub mod csv_reader;
pub mod data;
pub mod figure;
pub mod graph;
pub mod layout;
pub mod present;
pub mod runtime;
pub mod telemetry;

pub use counts::{value_counts, Category, CategoricalData, ValueCounts, MISSING_LABEL};
pub use data::PlotData;
pub use figure::{Axes, Bar, BarContainer, Figure};
pub use present::{ImageWriter, Present};
pub use runtime::{plot_value_counts, subplot_value_counts};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

/// Rendering and counting options.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderOptions {
    /// Bar width in category units
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    /// Most frequent categories kept per variable; `None` keeps all of them
    #[serde(default = "default_max_categories")]
    pub max_categories: Option<usize>,
    #[serde(default = "default_bar_color")]
    pub bar_color: String,
    /// Fill of the missing-values bar
    #[serde(default = "default_missing_color")]
    pub missing_color: String,
    /// X tick label rotation in degrees
    #[serde(default = "default_label_rotation")]
    pub label_rotation: f64,
    #[serde(default = "default_title_font_size")]
    pub title_font_size: f64,
    /// Subplots per row
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// Width of a subplot grid figure, inches
    #[serde(default = "default_grid_width")]
    pub grid_width: f64,
    /// Height of one grid row, inches
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Vertical space between grid rows, relative to the row height
    #[serde(default = "default_hspace")]
    pub hspace: f64,
    /// Size of a fresh figure, inches
    #[serde(default = "default_figsize")]
    pub figsize: [f64; 2],
    #[serde(default = "default_dpi")]
    pub dpi: f64,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_bar_width() -> f64 { 0.8 }
fn default_max_categories() -> Option<usize> { Some(counts::DEFAULT_MAX_CATEGORIES) }
fn default_bar_color() -> String { "green".to_string() }
fn default_missing_color() -> String { "red".to_string() }
fn default_label_rotation() -> f64 { 80.0 }
fn default_title_font_size() -> f64 { 14.0 }
fn default_columns() -> usize { 2 }
fn default_grid_width() -> f64 { 14.0 }
fn default_row_height() -> f64 { 6.0 }
fn default_hspace() -> f64 { 1.0 }
fn default_figsize() -> [f64; 2] { [6.4, 4.8] }
fn default_dpi() -> f64 { 100.0 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            max_categories: default_max_categories(),
            bar_color: default_bar_color(),
            missing_color: default_missing_color(),
            label_rotation: default_label_rotation(),
            title_font_size: default_title_font_size(),
            columns: default_columns(),
            grid_width: default_grid_width(),
            row_height: default_row_height(),
            hspace: default_hspace(),
            figsize: default_figsize(),
            dpi: default_dpi(),
            format: OutputFormat::Png,
        }
    }
}

impl RenderOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).context("Failed to parse render options")?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Reject values that cannot produce a figure
    pub fn validate(&self) -> Result<()> {
        if !(self.bar_width.is_finite() && self.bar_width > 0.0) {
            bail!("Bar width must be a positive number (got {})", self.bar_width);
        }
        if self.columns == 0 {
            bail!("Subplots per row must be at least 1");
        }
        let sizes = [
            ("grid_width", self.grid_width),
            ("row_height", self.row_height),
            ("figsize width", self.figsize[0]),
            ("figsize height", self.figsize[1]),
            ("dpi", self.dpi),
            ("title_font_size", self.title_font_size),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                bail!("{} must be a positive number (got {})", name, value);
            }
        }
        if !(self.hspace.is_finite() && self.hspace >= 0.0) {
            bail!("hspace must be zero or positive (got {})", self.hspace);
        }
        color::resolve_color(&self.bar_color)?;
        color::resolve_color(&self.missing_color)?;
        Ok(())
    }
}
