//! Drawing surface model.
//!
//! A [`Figure`] owns a set of [`Axes`] placed on subplot grids. Drawing
//! operations only record what should appear; [`crate::graph`] turns the
//! recorded figure into pixels when it is presented.

use anyhow::{bail, Result};
use plotters::style::RGBColor;
use tracing::debug;

use crate::layout::{self, Grid, PixelRect, SubplotParams};
use crate::present::Present;
use crate::RenderOptions;

/// One rendered bar
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Left edge in data coordinates
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub color: RGBColor,
}

impl Bar {
    pub fn set_color(&mut self, color: RGBColor) {
        self.color = color;
    }

    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Bars produced by a single [`Axes::bar`] call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarContainer {
    bars: Vec<Bar>,
}

impl BarContainer {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Bar> {
        self.bars.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Bar> {
        self.bars.get_mut(index)
    }
}

impl std::ops::Index<usize> for BarContainer {
    type Output = Bar;

    fn index(&self, index: usize) -> &Bar {
        &self.bars[index]
    }
}

impl std::ops::IndexMut<usize> for BarContainer {
    fn index_mut(&mut self, index: usize) -> &mut Bar {
        &mut self.bars[index]
    }
}

impl<'a> IntoIterator for &'a BarContainer {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

/// A single plotting area at a position of a subplot grid
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    grid: Grid,
    index: usize,
    title: Option<String>,
    containers: Vec<BarContainer>,
    x_ticks: Vec<f64>,
    x_tick_labels: Vec<String>,
    x_tick_rotation: f64,
}

impl Axes {
    fn new(grid: Grid, index: usize) -> Self {
        Self {
            grid,
            index,
            title: None,
            containers: Vec::new(),
            x_ticks: Vec::new(),
            x_tick_labels: Vec::new(),
            x_tick_rotation: 0.0,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// 0-based row-major index in the grid
    pub fn index(&self) -> usize {
        self.index
    }

    /// (row, col) in the grid
    pub fn position(&self) -> (usize, usize) {
        self.grid.position(self.index)
    }

    /// Draw one bar per `(left, height)` pair and return the new container
    pub fn bar<I>(&mut self, bars: I, width: f64, color: RGBColor) -> &mut BarContainer
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let container = BarContainer {
            bars: bars
                .into_iter()
                .map(|(left, height)| Bar { left, width, height, color })
                .collect(),
        };
        let idx = self.containers.len();
        self.containers.push(container);
        &mut self.containers[idx]
    }

    pub fn containers(&self) -> &[BarContainer] {
        &self.containers
    }

    /// All bars of the axes in drawing order
    pub fn bars(&self) -> impl Iterator<Item = &Bar> {
        self.containers.iter().flat_map(|c| c.iter())
    }

    pub fn set_xticks(&mut self, ticks: Vec<f64>, labels: Vec<String>, rotation: f64) -> Result<()> {
        if ticks.len() != labels.len() {
            bail!(
                "Ticks and labels must have the same length (ticks: {}, labels: {})",
                ticks.len(),
                labels.len()
            );
        }
        self.x_ticks = ticks;
        self.x_tick_labels = labels;
        self.x_tick_rotation = rotation;
        Ok(())
    }

    pub fn x_ticks(&self) -> &[f64] {
        &self.x_ticks
    }

    pub fn x_tick_labels(&self) -> &[String] {
        &self.x_tick_labels
    }

    pub fn x_tick_rotation(&self) -> f64 {
        self.x_tick_rotation
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Tallest bar, 0.0 when there are no bars
    pub fn max_height(&self) -> f64 {
        self.bars().map(|b| b.height).fold(0.0, f64::max)
    }

    /// Horizontal extent covered by the bars
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        self.bars().fold(None, |acc, b| {
            let (lo, hi) = (b.left, b.left + b.width);
            Some(match acc {
                Some((min, max)) => (f64::min(min, lo), f64::max(max, hi)),
                None => (lo, hi),
            })
        })
    }
}

/// The drawing surface
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    width: f64,
    height: f64,
    dpi: f64,
    axes: Vec<Axes>,
    current: Option<usize>,
    params: SubplotParams,
    presented: bool,
}

impl Figure {
    /// New empty figure of `width` x `height` inches
    pub fn new(width: f64, height: f64, dpi: f64) -> Self {
        Self {
            width,
            height,
            dpi,
            axes: Vec::new(),
            current: None,
            params: SubplotParams::default(),
            presented: false,
        }
    }

    pub fn from_options(options: &RenderOptions) -> Self {
        Self::new(options.figsize[0], options.figsize[1], options.dpi)
    }

    /// Size in inches
    pub fn size_inches(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn set_size_inches(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Size in pixels, at least 1x1
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * self.dpi).round().max(1.0) as u32;
        (px(self.width), px(self.height))
    }

    /// Drop all axes and return to a blank surface
    pub fn clear(&mut self) {
        self.axes.clear();
        self.current = None;
        self.params = SubplotParams::default();
        self.presented = false;
    }

    /// Current axes, created as a single full-figure cell if none exists
    pub fn gca(&mut self) -> &mut Axes {
        let idx = match self.current {
            Some(idx) => idx,
            None => {
                self.axes.push(Axes::new(Grid { nrows: 1, ncols: 1 }, 0));
                let idx = self.axes.len() - 1;
                self.current = Some(idx);
                idx
            }
        };
        &mut self.axes[idx]
    }

    /// Select cell `index` (0-based, row-major) of an `nrows` x `ncols` grid
    /// and make it current. An axes already at that position is reused.
    pub fn subplot(&mut self, nrows: usize, ncols: usize, index: usize) -> Result<&mut Axes> {
        let grid = Grid { nrows, ncols };
        if grid.cells() == 0 {
            bail!("Subplot grid must have at least one row and one column");
        }
        if index >= grid.cells() {
            bail!(
                "Subplot index {} out of range for a {}x{} grid",
                index,
                nrows,
                ncols
            );
        }

        let idx = match self
            .axes
            .iter()
            .position(|a| a.grid == grid && a.index == index)
        {
            Some(idx) => idx,
            None => {
                self.axes.push(Axes::new(grid, index));
                self.axes.len() - 1
            }
        };
        debug!(nrows, ncols, index, "selected subplot");
        self.current = Some(idx);
        Ok(&mut self.axes[idx])
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn subplots_adjust(&mut self, hspace: f64) {
        self.params.hspace = hspace;
    }

    pub fn subplot_params(&self) -> &SubplotParams {
        &self.params
    }

    /// Pixel rectangle of every axes, in the same order as [`Figure::axes`]
    pub fn panel_rects(&self) -> Result<Vec<PixelRect>> {
        let size = self.pixel_size();
        self.axes
            .iter()
            .map(|a| layout::cell_rect(&self.params, a.grid, a.index, size))
            .collect()
    }

    /// Hand the figure to `presenter`
    pub fn show<P: Present + ?Sized>(&mut self, presenter: &mut P) -> Result<()> {
        presenter.present(self)?;
        self.presented = true;
        Ok(())
    }

    pub fn is_presented(&self) -> bool {
        self.presented
    }
}
