//! One builder per [`PlotKind`](super::PlotKind).

use std::collections::HashMap;

use crate::data::model::{CellValue, Column, Table};
use crate::data::pivot::{Grid, pivot_mean};
use crate::data::summary::mean;
use crate::error::{DashboardError, Result};

use super::iso::{iso_lines, levels};
use super::stats::{bin_edges, bin_index, box_stats, kde_2d, kde_profile};
use super::{
    BarItem, Bin2d, BoxItem, ChartBody, PieSlice, Plotted, RenderOptions, ViolinItem,
};

/// Degrees where the first pie wedge starts.
pub const PIE_START_ANGLE: f64 = 140.0;
/// Grid points along each violin.
const VIOLIN_GRIDSIZE: usize = 100;
/// Bandwidths the violin extends past the extreme values.
const VIOLIN_CUT: f64 = 2.0;
/// Resolution of the histogram density overlay.
const DENSITY_GRID: usize = 40;
/// Number of density iso-lines over a histogram.
const DENSITY_LEVELS: usize = 5;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Column values as plot coordinates.
///
/// Numeric columns map to themselves. Anything else maps to category codes
/// in order of first appearance, with the labels kept for tick marks.
struct Encoded {
    coords: Vec<Option<f64>>,
    categories: Vec<String>,
}

fn encode(col: &Column) -> Encoded {
    if col.is_numeric() {
        return Encoded {
            coords: col.values.iter().map(CellValue::as_f64).collect(),
            categories: Vec::new(),
        };
    }
    let mut codes: HashMap<&CellValue, usize> = HashMap::new();
    let mut categories = Vec::new();
    let coords = col
        .values
        .iter()
        .map(|v| {
            if v.is_null() {
                return None;
            }
            let next = codes.len();
            let code = *codes.entry(v).or_insert_with(|| {
                categories.push(v.to_string());
                next
            });
            Some(code as f64)
        })
        .collect();
    Encoded { coords, categories }
}

/// `(x, y)` pairs in row order, skipping rows with a missing coordinate.
fn paired(x: &Encoded, y: &Encoded) -> Vec<[f64; 2]> {
    x.coords
        .iter()
        .zip(&y.coords)
        .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
        .collect()
}

fn require_numeric(col: &Column) -> Result<()> {
    if col.is_numeric() {
        Ok(())
    } else {
        Err(DashboardError::TypeMismatch {
            column: col.name.clone(),
            expected: "numeric",
        })
    }
}

/// Numeric `y` values grouped by the categories of `x`.
///
/// Text categories keep their order of first appearance; numeric categories
/// are sorted. Rows with a missing key or value are skipped.
fn group_by(x: &Column, y: &Column) -> Vec<(String, Vec<f64>)> {
    let mut order: Vec<&CellValue> = Vec::new();
    let mut groups: HashMap<&CellValue, Vec<f64>> = HashMap::new();
    for (key, value) in x.values.iter().zip(&y.values) {
        let Some(v) = value.as_f64() else {
            continue;
        };
        if key.is_null() {
            continue;
        }
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(v);
    }
    if x.is_numeric() {
        order.sort();
    }
    order
        .into_iter()
        .map(|key| (key.to_string(), groups.remove(key).unwrap_or_default()))
        .collect()
}

/// Positional value column used by Contour and Heatmap.
fn third_column(table: &Table) -> Result<&Column> {
    table.columns().get(2).ok_or_else(|| {
        DashboardError::ShapeError(format!(
            "needs a third column for values, table has {}",
            table.n_cols()
        ))
    })
}

fn pivot_on_third(table: &Table, x: &Column, y: &Column) -> Result<Grid> {
    let values = third_column(table)?;
    pivot_mean(table, &y.name, &x.name, &values.name)
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn line(_table: &Table, x: &Column, y: &Column, _opts: &RenderOptions) -> Result<Plotted> {
    let (ex, ey) = (encode(x), encode(y));
    Ok(Plotted {
        body: ChartBody::Line {
            points: paired(&ex, &ey),
        },
        x_categories: ex.categories,
        y_categories: ey.categories,
    })
}

pub fn scatter(_table: &Table, x: &Column, y: &Column, _opts: &RenderOptions) -> Result<Plotted> {
    let (ex, ey) = (encode(x), encode(y));
    Ok(Plotted {
        body: ChartBody::Scatter {
            points: paired(&ex, &ey),
        },
        x_categories: ex.categories,
        y_categories: ey.categories,
    })
}

/// Mean of `y` per `x` category.
pub fn bar(_table: &Table, x: &Column, y: &Column, _opts: &RenderOptions) -> Result<Plotted> {
    require_numeric(y)?;
    let groups = group_by(x, y);
    let bars = groups
        .iter()
        .enumerate()
        .map(|(i, (label, values))| BarItem {
            position: i as f64,
            height: mean(values),
            label: label.clone(),
        })
        .collect();
    Ok(Plotted {
        body: ChartBody::Bars { bars },
        x_categories: groups.into_iter().map(|(label, _)| label).collect(),
        y_categories: Vec::new(),
    })
}

/// Bivariate histogram with a kernel density overlay.
pub fn histogram(_table: &Table, x: &Column, y: &Column, opts: &RenderOptions) -> Result<Plotted> {
    require_numeric(x)?;
    require_numeric(y)?;
    let points = paired(&encode(x), &encode(y));
    let xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
    let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();

    let n_bins = opts.histogram_bins.max(1);
    let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
    let mut bins = Vec::new();
    let mut max_count = 0;
    if !points.is_empty() {
        let (x0, wx) = bin_edges(&xs, n_bins);
        let (y0, wy) = bin_edges(&ys, n_bins);
        for [px, py] in &points {
            let key = (bin_index(*px, x0, wx, n_bins), bin_index(*py, y0, wy, n_bins));
            *counts.entry(key).or_default() += 1;
        }
        let mut keys: Vec<_> = counts.keys().copied().collect();
        keys.sort();
        for (ix, iy) in keys {
            let count = counts[&(ix, iy)];
            max_count = max_count.max(count);
            bins.push(Bin2d {
                x: [x0 + wx * ix as f64, x0 + wx * (ix + 1) as f64],
                y: [y0 + wy * iy as f64, y0 + wy * (iy + 1) as f64],
                count,
            });
        }
    }

    let density = match kde_2d(&xs, &ys, DENSITY_GRID) {
        Some(grid) => {
            let peak = grid.values.iter().copied().fold(0.0, f64::max);
            let [ox, oy] = grid.origin;
            let [sx, sy] = grid.step;
            iso_lines(
                &grid.values,
                grid.nx,
                grid.ny,
                &levels(0.0, peak, DENSITY_LEVELS),
                |ix, iy| [ox + sx * ix, oy + sy * iy],
            )?
        }
        None => Vec::new(),
    };

    Ok(Plotted::numeric(ChartBody::Histogram {
        bins,
        max_count,
        density,
    }))
}

/// Quartile boxes of `y` per `x` category.
pub fn boxplot(_table: &Table, x: &Column, y: &Column, _opts: &RenderOptions) -> Result<Plotted> {
    require_numeric(y)?;
    let groups = group_by(x, y);
    let boxes = groups
        .iter()
        .enumerate()
        .filter_map(|(i, (label, values))| {
            Some(BoxItem {
                position: i as f64,
                label: label.clone(),
                stats: box_stats(values)?,
            })
        })
        .collect();
    Ok(Plotted {
        body: ChartBody::Boxes { boxes },
        x_categories: groups.into_iter().map(|(label, _)| label).collect(),
        y_categories: Vec::new(),
    })
}

/// Wedges proportional to `y`, labelled by `x`, counter-clockwise from 140°.
pub fn pie(_table: &Table, x: &Column, y: &Column, _opts: &RenderOptions) -> Result<Plotted> {
    require_numeric(y)?;
    let entries: Vec<(String, f64)> = x
        .values
        .iter()
        .zip(&y.values)
        .filter_map(|(label, value)| Some((label.to_string(), value.as_f64()?)))
        .collect();

    if entries.iter().any(|(_, v)| *v < 0.0) {
        return Err(DashboardError::InvalidValues(
            "wedge sizes must be non-negative".into(),
        ));
    }
    let total: f64 = entries.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Err(DashboardError::InvalidValues(
            "wedge sizes must sum to a positive value".into(),
        ));
    }

    let mut angle = PIE_START_ANGLE;
    let slices = entries
        .into_iter()
        .map(|(label, value)| {
            let fraction = value / total;
            let start_deg = angle;
            angle += 360.0 * fraction;
            PieSlice {
                label,
                value,
                fraction,
                start_deg,
                end_deg: angle,
                pct_label: format!("{:.1}%", fraction * 100.0),
            }
        })
        .collect();

    Ok(Plotted::numeric(ChartBody::Pie { slices }))
}

/// Filled region between zero and the x→y line. Missing `y` counts as zero.
pub fn area(_table: &Table, x: &Column, y: &Column, _opts: &RenderOptions) -> Result<Plotted> {
    require_numeric(y)?;
    let ex = encode(x);
    let points: Vec<[f64; 2]> = ex
        .coords
        .iter()
        .zip(&y.values)
        .filter_map(|(x, y)| Some([(*x)?, y.as_f64().unwrap_or(0.0)]))
        .collect();

    let has_pos = points.iter().any(|p| p[1] > 0.0);
    let has_neg = points.iter().any(|p| p[1] < 0.0);
    if has_pos && has_neg {
        return Err(DashboardError::InvalidValues(format!(
            "column '{}' must be either all positive or all negative for an area plot",
            y.name
        )));
    }

    Ok(Plotted {
        body: ChartBody::Area { points },
        x_categories: ex.categories,
        y_categories: Vec::new(),
    })
}

/// Iso-lines over the (y × x) pivot of the table's third column.
pub fn contour(table: &Table, x: &Column, y: &Column, opts: &RenderOptions) -> Result<Plotted> {
    let grid = pivot_on_third(table, x, y)?;
    if grid.n_rows() < 2 || grid.n_cols() < 2 {
        return Err(DashboardError::ShapeError(format!(
            "contour needs at least a 2x2 grid, pivot is {}x{}",
            grid.n_rows(),
            grid.n_cols()
        )));
    }
    let value_range = grid
        .value_range()
        .ok_or_else(|| DashboardError::ShapeError("pivot has no values".into()))?;

    let flat: Vec<f64> = grid.values.iter().flatten().copied().collect();
    let lines = iso_lines(
        &flat,
        grid.n_cols(),
        grid.n_rows(),
        &levels(value_range.0, value_range.1, opts.contour_levels),
        |ix, iy| [ix, iy],
    )?;

    Ok(Plotted {
        body: ChartBody::Contour { lines, value_range },
        x_categories: grid.col_labels,
        y_categories: grid.row_labels,
    })
}

/// Colour-encoded (y × x) pivot of the table's third column.
///
/// Rows are stored bottom-up so the first index label ends up at the top of
/// the plot, as heatmaps are read.
pub fn heatmap(table: &Table, x: &Column, y: &Column, _opts: &RenderOptions) -> Result<Plotted> {
    let mut grid = pivot_on_third(table, x, y)?;
    grid.row_labels.reverse();
    grid.values.reverse();
    let value_range = grid
        .value_range()
        .ok_or_else(|| DashboardError::ShapeError("pivot has no values".into()))?;
    Ok(Plotted {
        x_categories: grid.col_labels.clone(),
        y_categories: grid.row_labels.clone(),
        body: ChartBody::Heatmap { grid, value_range },
    })
}

/// Kernel density shape of `y` per `x` category.
pub fn violin(_table: &Table, x: &Column, y: &Column, _opts: &RenderOptions) -> Result<Plotted> {
    require_numeric(y)?;
    let groups = group_by(x, y);
    let violins = groups
        .iter()
        .enumerate()
        .filter_map(|(i, (label, values))| {
            let stats = box_stats(values)?;
            let profile = kde_profile(values, VIOLIN_GRIDSIZE, VIOLIN_CUT)
                .unwrap_or_else(|| vec![[stats.median, 1.0]]);
            Some(ViolinItem {
                position: i as f64,
                label: label.clone(),
                profile,
                stats,
            })
        })
        .collect();
    Ok(Plotted {
        body: ChartBody::Violins { violins },
        x_categories: groups.into_iter().map(|(label, _)| label).collect(),
        y_categories: Vec::new(),
    })
}
