use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use countplot::{csv_reader, telemetry, Figure, ImageWriter, OutputFormat, PlotData, RenderOptions};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Svg,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => OutputFormat::Png,
            Format::Svg => OutputFormat::Svg,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "countplot")]
#[command(about = "Plot category counts of CSV columns as bar charts", long_about = None)]
struct Args {
    /// Columns to plot, drawn two per row when more than one is given
    #[arg(required = true)]
    variables: Vec<String>,

    /// Read a JSON array of objects instead of CSV
    #[arg(long)]
    json: bool,

    /// Bar width in category units
    #[arg(long)]
    bar_width: Option<f64>,

    /// Most frequent categories to keep per column (0 keeps all)
    #[arg(long)]
    max_categories: Option<usize>,

    /// Output image format
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// JSON file with render options
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn render_options(&self) -> Result<RenderOptions> {
        let mut options = match &self.config {
            Some(path) => RenderOptions::from_path(path)?,
            None => RenderOptions::default(),
        };

        if let Some(width) = self.bar_width {
            options.bar_width = width;
        }
        if let Some(max) = self.max_categories {
            options.max_categories = if max == 0 { None } else { Some(max) };
        }
        if let Some(format) = self.format {
            options.format = format.into();
        }

        options.validate()?;
        Ok(options)
    }
}

fn read_input(json: bool) -> Result<PlotData> {
    if json {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read JSON from stdin")?;
        let value: serde_json::Value =
            serde_json::from_str(&input).context("Failed to parse JSON input")?;
        PlotData::from_json(&value)
    } else {
        csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")
    }
}

fn main() -> Result<()> {
    let _ = telemetry::init_tracing();
    let args = Args::parse();
    let options = args.render_options()?;

    let data = read_input(args.json)?;

    let stdout = io::stdout();
    let mut writer = ImageWriter::new(stdout.lock(), options.clone());
    let mut figure = Figure::from_options(&options);

    countplot::plot_value_counts(&mut figure, &data, args.variables.as_slice(), &options, &mut writer)
        .context("Failed to render plot")?;

    // A single variable is drawn but not presented by the library
    if !figure.is_presented() {
        debug!(panels = figure.axes().len(), "presenting single-variable figure");
        figure.show(&mut writer).context("Failed to write image to stdout")?;
    }

    Ok(())
}
