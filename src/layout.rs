//! Grid arithmetic for subplot figures.

use anyhow::{bail, Result};

/// Rows and columns of a subplot grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub nrows: usize,
    pub ncols: usize,
}

impl Grid {
    pub fn cells(&self) -> usize {
        self.nrows * self.ncols
    }

    /// (row, col) of a 0-based row-major index
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.ncols, index % self.ncols)
    }
}

/// Grid for `n` panels with `per_row` panels per row
pub fn grid_for(n: usize, per_row: usize) -> Grid {
    if n == 0 || per_row == 0 {
        return Grid { nrows: 0, ncols: 0 };
    }
    Grid {
        nrows: n.div_ceil(per_row),
        ncols: per_row.min(n),
    }
}

/// Figure size in inches: fixed width, height proportional to the row count
pub fn figure_size(grid: Grid, width: f64, row_height: f64) -> (f64, f64) {
    (width, row_height * grid.nrows as f64)
}

/// Placement of the subplot grid inside the figure, as figure fractions.
///
/// `wspace` and `hspace` are gaps between cells relative to the mean cell
/// width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubplotParams {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for SubplotParams {
    fn default() -> Self {
        Self {
            left: 0.06,
            right: 0.97,
            bottom: 0.04,
            top: 0.96,
            wspace: 0.2,
            hspace: 0.2,
        }
    }
}

/// Pixel rectangle, origin at the top-left corner of the figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Pixel rectangle of cell `index` in an `nrows` x `ncols` grid
pub fn cell_rect(
    params: &SubplotParams,
    grid: Grid,
    index: usize,
    (width, height): (u32, u32),
) -> Result<PixelRect> {
    if grid.cells() == 0 {
        bail!("Cannot place a subplot in an empty grid");
    }
    if index >= grid.cells() {
        bail!(
            "Subplot index {} out of range for a {}x{} grid",
            index,
            grid.nrows,
            grid.ncols
        );
    }

    let (row, col) = grid.position(index);
    let (x0, x1) = span(params.left, params.right, params.wspace, grid.ncols, col);
    // Rows count down from the top of the figure
    let (y0, y1) = span(1.0 - params.top, 1.0 - params.bottom, params.hspace, grid.nrows, row);

    let px = |frac: f64, total: u32| (frac * total as f64).round().max(0.0) as u32;
    let x = px(x0, width);
    let y = px(y0, height);

    Ok(PixelRect {
        x,
        y,
        width: px(x1, width).saturating_sub(x).max(1),
        height: px(y1, height).saturating_sub(y).max(1),
    })
}

/// Start and end fraction of slot `i` out of `n` in `[lo, hi]` with relative gap `space`
fn span(lo: f64, hi: f64, space: f64, n: usize, i: usize) -> (f64, f64) {
    let n = n as f64;
    let cell = (hi - lo) / (n + space * (n - 1.0));
    let start = lo + i as f64 * cell * (1.0 + space);
    (start, start + cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rows_are_ceil_half() {
        for n in 1..=9 {
            let grid = grid_for(n, 2);
            assert_eq!(grid.nrows, (n + 1) / 2, "n = {}", n);
            assert!(grid.cells() >= n);
        }
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_for(1, 2), Grid { nrows: 1, ncols: 1 });
        assert_eq!(grid_for(2, 2), Grid { nrows: 1, ncols: 2 });
        assert_eq!(grid_for(5, 2), Grid { nrows: 3, ncols: 2 });
        assert_eq!(grid_for(0, 2), Grid { nrows: 0, ncols: 0 });
    }

    #[test]
    fn test_grid_position_row_major() {
        let grid = grid_for(5, 2);
        assert_eq!(grid.position(0), (0, 0));
        assert_eq!(grid.position(1), (0, 1));
        assert_eq!(grid.position(4), (2, 0));
    }

    #[test]
    fn test_figure_size_scales_with_rows() {
        assert_eq!(figure_size(grid_for(2, 2), 14.0, 6.0), (14.0, 6.0));
        assert_eq!(figure_size(grid_for(3, 2), 14.0, 6.0), (14.0, 12.0));
        assert_eq!(figure_size(grid_for(7, 2), 14.0, 6.0), (14.0, 24.0));
    }

    #[test]
    fn test_cell_rect_single_cell_fills_params() {
        let params = SubplotParams::default();
        let rect = cell_rect(&params, Grid { nrows: 1, ncols: 1 }, 0, (1000, 1000)).unwrap();
        assert_eq!(rect, PixelRect { x: 60, y: 40, width: 910, height: 920 });
    }

    #[test]
    fn test_cell_rect_rows_do_not_overlap() {
        let params = SubplotParams { hspace: 1.0, ..SubplotParams::default() };
        let grid = grid_for(4, 2);
        let top = cell_rect(&params, grid, 0, (1400, 1200)).unwrap();
        let bottom = cell_rect(&params, grid, 2, (1400, 1200)).unwrap();

        assert_eq!(top.x, bottom.x);
        assert!(top.y + top.height < bottom.y);
        // hspace = 1 leaves a gap as tall as a cell
        let gap = bottom.y - (top.y + top.height);
        assert!((gap as i64 - top.height as i64).abs() <= 1);
    }

    #[test]
    fn test_cell_rect_columns_side_by_side() {
        let params = SubplotParams::default();
        let grid = grid_for(2, 2);
        let left = cell_rect(&params, grid, 0, (1400, 600)).unwrap();
        let right = cell_rect(&params, grid, 1, (1400, 600)).unwrap();
        assert_eq!(left.y, right.y);
        assert!(left.x + left.width < right.x);
        assert!(right.x + right.width <= 1400);
    }

    #[test]
    fn test_cell_rect_out_of_range() {
        let params = SubplotParams::default();
        assert!(cell_rect(&params, grid_for(3, 2), 3, (100, 100)).is_ok());
        let err = cell_rect(&params, grid_for(3, 2), 4, (100, 100)).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(cell_rect(&params, grid_for(0, 2), 0, (100, 100)).is_err());
    }
}
