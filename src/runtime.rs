// Value-count plotting: one bar chart per categorical variable

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::color::resolve_color;
use crate::counts::{value_counts, CategoricalData};
use crate::data::PlotData;
use crate::figure::{Axes, BarContainer, Figure};
use crate::layout;
use crate::present::Present;
use crate::RenderOptions;

/// Draw the category counts of `variable` on `axes`.
///
/// Bars are placed at consecutive integer offsets, the missing-values bar is
/// filled with `options.missing_color`, and tick labels sit under the bar
/// centers. Returns the drawn bars so callers can restyle them.
pub fn subplot_value_counts<'a>(
    axes: &'a mut Axes,
    data: &CategoricalData,
    variable: &str,
    options: &RenderOptions,
) -> Result<&'a mut BarContainer> {
    let width = options.bar_width;
    if !(width.is_finite() && width > 0.0) {
        anyhow::bail!("Bar width must be a positive number (got {})", width);
    }
    let bar_color = resolve_color(&options.bar_color)?;
    let missing_color = resolve_color(&options.missing_color)?;

    let counts = value_counts(data, variable, options.max_categories)?;
    let n_categories = counts.len();

    let ticks: Vec<f64> = (0..n_categories).map(|i| i as f64 + width / 2.0).collect();
    let labels: Vec<String> = counts.categories().map(|c| c.to_string()).collect();
    axes.set_xticks(ticks, labels, options.label_rotation)?;
    axes.set_title(format!("'{}' category counts", variable));

    let missing = counts.missing_position();
    let bars = axes.bar(
        counts.counts().enumerate().map(|(i, count)| (i as f64, count as f64)),
        width,
        bar_color,
    );

    if let Some(idx) = missing {
        if let Some(bar) = bars.get_mut(idx) {
            bar.set_color(missing_color);
        }
    }

    debug!(variable, bars = bars.len(), missing = missing.is_some(), "drew value counts");
    Ok(bars)
}

/// Plot the category counts of every variable in `variables`.
///
/// Missing entries of the whole table become a countable category first. A
/// single variable is drawn on the figure's current axes and left for the
/// caller to present. Several variables are laid out two per row on a
/// resized figure, which is then presented.
pub fn plot_value_counts<S, P>(
    figure: &mut Figure,
    data: &PlotData,
    variables: &[S],
    options: &RenderOptions,
    presenter: &mut P,
) -> Result<()>
where
    S: AsRef<str>,
    P: Present + ?Sized,
{
    if variables.is_empty() {
        anyhow::bail!("Plot requires at least one variable");
    }

    let data = data.fill_missing();

    if let [variable] = variables {
        subplot_value_counts(figure.gca(), &data, variable.as_ref(), options)?;
        return Ok(());
    }

    let grid = layout::grid_for(variables.len(), options.columns);
    let (width, height) = layout::figure_size(grid, options.grid_width, options.row_height);
    figure.clear();
    figure.set_size_inches(width, height);
    info!(
        variables = variables.len(),
        nrows = grid.nrows,
        ncols = grid.ncols,
        "laying out value count grid"
    );

    for (i, variable) in variables.iter().enumerate() {
        let variable = variable.as_ref();
        let axes = figure.subplot(grid.nrows, grid.ncols, i)?;
        subplot_value_counts(axes, &data, variable, options)
            .with_context(|| format!("Failed to plot value counts for '{}'", variable))?;
    }

    figure.subplots_adjust(options.hspace);
    figure.show(presenter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::Category;
    use crate::figure::Bar;
    use plotters::style::RGBColor;

    const GREEN: RGBColor = RGBColor(0, 128, 0);
    const RED: RGBColor = RGBColor(255, 0, 0);

    /// Records figures instead of rendering them
    #[derive(Default)]
    struct Recorder {
        shown: Vec<Figure>,
    }

    impl Present for Recorder {
        fn present(&mut self, figure: &Figure) -> Result<()> {
            self.shown.push(figure.clone());
            Ok(())
        }
    }

    fn make_plot_data(headers: Vec<&str>, rows: Vec<Vec<Option<&str>>>) -> PlotData {
        PlotData::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    fn status_data() -> PlotData {
        make_plot_data(
            vec!["status", "region"],
            vec![
                vec![Some("active"), Some("north")],
                vec![Some("active"), None],
                vec![Some("inactive"), Some("south")],
                vec![None, Some("north")],
                vec![Some("active"), Some("east")],
            ],
        )
    }

    fn heights(bars: &BarContainer) -> Vec<f64> {
        bars.iter().map(|b| b.height).collect()
    }

    #[test]
    fn test_subplot_status_example() {
        let data = status_data().fill_missing();
        let mut fig = Figure::new(6.4, 4.8, 100.0);
        let options = RenderOptions::default();

        let bars = subplot_value_counts(fig.gca(), &data, "status", &options).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(heights(bars), vec![3.0, 1.0, 1.0]);

        let axes = &fig.axes()[0];
        assert_eq!(axes.title(), Some("'status' category counts"));
        let labels = axes.x_tick_labels();
        assert_eq!(labels[0], "active");
        assert!(labels.contains(&"Missing values".to_string()));
        assert!(labels.contains(&"inactive".to_string()));

        // Only the missing-values bar is highlighted
        for (bar, label) in axes.containers()[0].iter().zip(labels) {
            if label == "Missing values" {
                assert_eq!(bar.color, RED);
            } else {
                assert_eq!(bar.color, GREEN);
            }
        }
    }

    #[test]
    fn test_subplot_bar_geometry() {
        let data = status_data().fill_missing();
        let mut fig = Figure::new(6.4, 4.8, 100.0);
        let options = RenderOptions { bar_width: 0.5, ..RenderOptions::default() };

        let bars = subplot_value_counts(fig.gca(), &data, "status", &options).unwrap();
        let lefts: Vec<f64> = bars.iter().map(|b| b.left).collect();
        assert_eq!(lefts, vec![0.0, 1.0, 2.0]);
        assert!(bars.iter().all(|b| b.width == 0.5));

        let axes = &fig.axes()[0];
        assert_eq!(axes.x_ticks(), &[0.25, 1.25, 2.25]);
        for (bar, tick) in axes.containers()[0].iter().zip(axes.x_ticks()) {
            assert!((bar.center() - tick).abs() < 1e-12);
        }
        assert_eq!(axes.x_tick_rotation(), 80.0);
    }

    #[test]
    fn test_subplot_returned_bars_can_be_restyled() {
        let data = status_data().fill_missing();
        let mut fig = Figure::new(6.4, 4.8, 100.0);

        let bars =
            subplot_value_counts(fig.gca(), &data, "status", &RenderOptions::default()).unwrap();
        bars[0].set_color(RGBColor(0, 0, 255));

        let first: &Bar = &fig.axes()[0].containers()[0][0];
        assert_eq!(first.color, RGBColor(0, 0, 255));
    }

    #[test]
    fn test_subplot_without_missing_values() {
        let data = make_plot_data(vec!["x"], vec![vec![Some("a")], vec![Some("b")]]).fill_missing();
        let mut fig = Figure::new(6.4, 4.8, 100.0);
        let bars = subplot_value_counts(fig.gca(), &data, "x", &RenderOptions::default()).unwrap();
        assert!(bars.iter().all(|b| b.color == GREEN));
    }

    #[test]
    fn test_subplot_missing_label_collision_stays_separate() {
        let data = make_plot_data(
            vec!["x"],
            vec![vec![Some("Missing values")], vec![None], vec![None]],
        )
        .fill_missing();
        let mut fig = Figure::new(6.4, 4.8, 100.0);
        let bars = subplot_value_counts(fig.gca(), &data, "x", &RenderOptions::default()).unwrap();

        assert_eq!(heights(bars), vec![2.0, 1.0]);
        assert_eq!(bars[0].color, RED);
        assert_eq!(bars[1].color, GREEN);
    }

    #[test]
    fn test_subplot_truncates_to_max_categories() {
        let values: Vec<String> = (0..45).map(|i| format!("c{}", i)).collect();
        let data = make_plot_data(
            vec!["x"],
            values.iter().map(|v| vec![Some(v.as_str())]).collect(),
        )
        .fill_missing();
        let mut fig = Figure::new(6.4, 4.8, 100.0);

        let bars = subplot_value_counts(fig.gca(), &data, "x", &RenderOptions::default()).unwrap();
        assert_eq!(bars.len(), 30);

        let options = RenderOptions { max_categories: Some(5), ..RenderOptions::default() };
        let mut fig = Figure::new(6.4, 4.8, 100.0);
        let bars = subplot_value_counts(fig.gca(), &data, "x", &options).unwrap();
        assert_eq!(bars.len(), 5);
    }

    #[test]
    fn test_subplot_unknown_column() {
        let data = status_data().fill_missing();
        let mut fig = Figure::new(6.4, 4.8, 100.0);
        let result = subplot_value_counts(fig.gca(), &data, "nope", &RenderOptions::default());
        assert!(result.unwrap_err().to_string().contains("Column 'nope' not found"));
    }

    #[test]
    fn test_subplot_rejects_bad_width() {
        let data = status_data().fill_missing();
        let mut fig = Figure::new(6.4, 4.8, 100.0);
        let options = RenderOptions { bar_width: -1.0, ..RenderOptions::default() };
        assert!(subplot_value_counts(fig.gca(), &data, "status", &options).is_err());
    }

    #[test]
    fn test_plot_single_variable_matches_direct_call() {
        let data = status_data();
        let options = RenderOptions::default();

        let mut via_list = Figure::from_options(&options);
        let mut recorder = Recorder::default();
        plot_value_counts(&mut via_list, &data, &["status"], &options, &mut recorder).unwrap();

        let mut direct = Figure::from_options(&options);
        subplot_value_counts(direct.gca(), &data.fill_missing(), "status", &options).unwrap();

        assert_eq!(via_list, direct);
        // Single variable path leaves presentation to the caller
        assert!(recorder.shown.is_empty());
        assert!(!via_list.is_presented());
    }

    #[test]
    fn test_plot_multiple_variables_grid() {
        let data = status_data();
        let options = RenderOptions::default();
        let mut fig = Figure::from_options(&options);
        let mut recorder = Recorder::default();

        let variables = ["status", "region", "status"];
        plot_value_counts(&mut fig, &data, &variables, &options, &mut recorder).unwrap();

        assert_eq!(recorder.shown.len(), 1);
        assert!(fig.is_presented());
        assert_eq!(fig.size_inches(), (14.0, 12.0));
        assert_eq!(fig.subplot_params().hspace, 1.0);

        let axes = fig.axes();
        assert_eq!(axes.len(), 3);
        for (i, (ax, variable)) in axes.iter().zip(variables).enumerate() {
            assert_eq!(ax.grid().nrows, 2);
            assert_eq!(ax.grid().ncols, 2);
            assert_eq!(ax.index(), i);
            assert_eq!(ax.title(), Some(format!("'{}' category counts", variable).as_str()));
        }
    }

    #[test]
    fn test_plot_rows_are_ceil_half() {
        let headers: Vec<String> = (0..7).map(|i| format!("v{}", i)).collect();
        let data = PlotData::new(headers.clone(), vec![vec![Some("a".to_string()); 7]]);
        let options = RenderOptions::default();

        for n in 2..=7 {
            let mut fig = Figure::from_options(&options);
            let mut recorder = Recorder::default();
            plot_value_counts(&mut fig, &data, &headers[..n], &options, &mut recorder).unwrap();

            let nrows = (n + 1) / 2;
            assert_eq!(fig.axes().len(), n);
            assert!(fig.axes().iter().all(|a| a.grid().nrows == nrows));
            assert_eq!(fig.size_inches().1, 6.0 * nrows as f64);
        }
    }

    #[test]
    fn test_plot_fills_missing_in_every_column() {
        let data = status_data();
        let options = RenderOptions::default();
        let mut fig = Figure::from_options(&options);
        let mut recorder = Recorder::default();
        plot_value_counts(&mut fig, &data, &["status", "region"], &options, &mut recorder)
            .unwrap();

        let region = &fig.axes()[1];
        let missing = region
            .x_tick_labels()
            .iter()
            .position(|l| l == Category::Missing.label())
            .unwrap();
        assert_eq!(region.containers()[0][missing].height, 1.0);
        assert_eq!(region.containers()[0][missing].color, RED);
        // The caller's table is not modified
        assert_eq!(data.rows[1][1], None);
    }

    #[test]
    fn test_plot_unknown_column_propagates() {
        let data = status_data();
        let options = RenderOptions::default();
        let mut fig = Figure::from_options(&options);
        let mut recorder = Recorder::default();

        let result = plot_value_counts(&mut fig, &data, &["status", "nope"], &options, &mut recorder);
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Column 'nope' not found"));
        assert!(recorder.shown.is_empty());
    }

    #[test]
    fn test_plot_requires_variables() {
        let data = status_data();
        let options = RenderOptions::default();
        let mut fig = Figure::from_options(&options);
        let mut recorder = Recorder::default();
        let none: [&str; 0] = [];
        let result = plot_value_counts(&mut fig, &data, &none, &options, &mut recorder);
        assert!(result.unwrap_err().to_string().contains("at least one variable"));
    }
}
