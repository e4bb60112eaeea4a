use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use tracing::debug;

use crate::figure::{Axes, Figure};
use crate::layout::PixelRect;
use crate::{OutputFormat, RenderOptions};

const AXIS_FONT_SIZE: f64 = 12.0;

/// Render a figure in the configured output format
pub fn render(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
    match options.format {
        OutputFormat::Png => render_png(figure, options),
        OutputFormat::Svg => render_svg(figure, options),
    }
}

/// Render a figure to PNG bytes
pub fn render_png(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = figure.pixel_size();
    let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure, options)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    debug!(width, height, bytes = png_bytes.len(), "rendered png");
    Ok(png_bytes)
}

/// Render a figure to an SVG document
pub fn render_svg(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = figure.pixel_size();
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_figure(&root, figure, options)?;
        root.present().context("Failed to present drawing")?;
    }

    debug!(width, height, bytes = svg.len(), "rendered svg");
    Ok(svg.into_bytes())
}

fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure, options: &RenderOptions) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let rects = figure.panel_rects()?;
    for (axes, rect) in figure.axes().iter().zip(rects) {
        draw_axes(root, axes, rect, options)?;
    }

    Ok(())
}

/// Draw one panel inside its grid cell
fn draw_axes<DB>(
    root: &DrawingArea<DB, Shift>,
    axes: &Axes,
    rect: PixelRect,
    options: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = root
        .clone()
        .shrink((rect.x, rect.y), (rect.width, rect.height));

    // Ticks sit at slot + shift; the chart is drawn in slot units so that
    // every tick lands on an integer key point.
    let shift = tick_shift(axes.x_ticks());
    let slots = TickSlots::new(axes, shift);
    let x_range = x_range(axes, shift);
    let y_range = y_range(axes);

    let rotation = snap_rotation(axes.x_tick_rotation());
    let label_font = ("sans-serif", AXIS_FONT_SIZE).into_font().transform(rotation.clone());
    let title_font = ("sans-serif", options.title_font_size).into_font();

    let mut builder = ChartBuilder::on(&area);
    builder
        .margin(8)
        .x_label_area_size(x_label_area_size(axes.x_tick_labels(), rotation, rect.height))
        .y_label_area_size(50);
    if let Some(title) = axes.title() {
        builder.caption(title, title_font);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    let formatter = |x: &f64| slots.label_at(*x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots.len())
        .x_label_formatter(&formatter)
        .x_label_style(label_font)
        .draw()
        .context("Failed to draw mesh")?;

    chart
        .draw_series(axes.bars().map(|bar| {
            let left = bar.left - shift;
            Rectangle::new(
                [(left, 0.0), (left + bar.width, bar.height)],
                bar.color.filled(),
            )
        }))
        .context("Failed to draw bars")?;

    Ok(())
}

/// Fractional offset of the ticks from the integer grid
fn tick_shift(ticks: &[f64]) -> f64 {
    ticks.first().map(|t| t - t.floor()).unwrap_or(0.0)
}

/// Tick labels indexed by integer slot
struct TickSlots {
    labels: Vec<Option<String>>,
}

impl TickSlots {
    fn new(axes: &Axes, shift: f64) -> Self {
        let mut labels: Vec<Option<String>> = Vec::new();
        for (tick, label) in axes.x_ticks().iter().zip(axes.x_tick_labels()) {
            let slot = (tick - shift).round();
            if slot < 0.0 {
                continue;
            }
            let slot = slot as usize;
            if labels.len() <= slot {
                labels.resize(slot + 1, None);
            }
            labels[slot] = Some(label.clone());
        }
        Self { labels }
    }

    fn len(&self) -> usize {
        self.labels.len()
    }

    fn label_at(&self, x: f64) -> String {
        let slot = x.round();
        if (x - slot).abs() > 1e-6 || slot < 0.0 {
            return String::new();
        }
        self.labels
            .get(slot as usize)
            .and_then(|l| l.clone())
            .unwrap_or_default()
    }
}

fn x_range(axes: &Axes, shift: f64) -> Range<f64> {
    match axes.x_extent() {
        Some((lo, hi)) => {
            let width = hi - lo;
            // Keep at least half a slot around the outer bars when they are narrow
            let bar_width = axes.bars().next().map(|b| b.width).unwrap_or(width);
            let pad = ((1.0 - bar_width) / 2.0).max(0.1);
            (lo - shift - pad)..(hi - shift + pad)
        }
        None => -0.5..0.5,
    }
}

fn y_range(axes: &Axes) -> Range<f64> {
    let max = axes.max_height();
    if max > 0.0 {
        0.0..max * 1.05
    } else {
        0.0..1.0
    }
}

/// Nearest quarter turn to `degrees`; the backends only rotate text by multiples of 90
pub(crate) fn snap_rotation(degrees: f64) -> FontTransform {
    if !degrees.is_finite() {
        return FontTransform::None;
    }
    let quarter = ((degrees.rem_euclid(360.0)) / 90.0).round() as i64 % 4;
    match quarter {
        1 => FontTransform::Rotate90,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate270,
        _ => FontTransform::None,
    }
}

/// Room below the x axis for the tick labels
fn x_label_area_size(labels: &[String], rotation: FontTransform, panel_height: u32) -> u32 {
    let vertical = matches!(rotation, FontTransform::Rotate90 | FontTransform::Rotate270);
    if !vertical {
        return (AXIS_FONT_SIZE * 2.5) as u32;
    }
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let wanted = (longest as f64 * AXIS_FONT_SIZE * 0.6 + 12.0) as u32;
    wanted.clamp(30, (panel_height / 2).max(30))
}
