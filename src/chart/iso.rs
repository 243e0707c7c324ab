//! Iso-line extraction over regular grids, backed by the `contour` crate.

use contour::ContourBuilder;

use crate::error::{DashboardError, Result};

/// All line strings at one threshold, in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct IsoLine {
    pub level: f64,
    pub paths: Vec<Vec<[f64; 2]>>,
}

/// `count` evenly spaced thresholds strictly inside `(lo, hi)`.
pub fn levels(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    (1..=count)
        .map(|k| lo + (hi - lo) * k as f64 / (count + 1) as f64)
        .collect()
}

/// Trace iso-lines of a row-major `nx` × `ny` grid.
///
/// NaN cells count as below every threshold. Grid cell `(ix, iy)` is mapped
/// to data space through `to_data(ix, iy)`, where fractional indices are
/// interpolated positions between cells.
pub fn iso_lines(
    values: &[f64],
    nx: usize,
    ny: usize,
    thresholds: &[f64],
    to_data: impl Fn(f64, f64) -> [f64; 2],
) -> Result<Vec<IsoLine>> {
    let floor = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::INFINITY, f64::min);
    let below = thresholds.iter().copied().fold(floor, f64::min) - 1.0;
    let filled: Vec<f64> = values
        .iter()
        .map(|&v| if v.is_finite() { v } else { below })
        .collect();

    let builder = ContourBuilder::new(nx as _, ny as _, true);
    let lines = builder
        .lines(&filled, thresholds)
        .map_err(|e| DashboardError::ShapeError(format!("contouring failed: {e:?}")))?;

    // The tracer places cell centres at half-integer coordinates.
    Ok(lines
        .iter()
        .map(|line| IsoLine {
            level: line.threshold(),
            paths: line
                .geometry()
                .0
                .iter()
                .map(|ls| {
                    ls.0.iter()
                        .map(|c| to_data(c.x - 0.5, c.y - 0.5))
                        .collect()
                })
                .filter(|path: &Vec<[f64; 2]>| path.len() > 1)
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_exclude_the_extremes() {
        assert_eq!(levels(0.0, 4.0, 3), vec![1.0, 2.0, 3.0]);
        assert!(levels(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn traces_a_ring_around_a_peak() {
        // 5x5 grid with a single high cell in the middle.
        let mut values = vec![0.0; 25];
        values[12] = 10.0;
        let lines = iso_lines(&values, 5, 5, &[5.0], |x, y| [x, y]).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, 5.0);
        let points: Vec<[f64; 2]> = lines[0].paths.iter().flatten().copied().collect();
        assert!(!points.is_empty());
        for [x, y] in points {
            assert!((1.0..=3.0).contains(&x), "x = {x}");
            assert!((1.0..=3.0).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn nan_cells_do_not_leak_into_coordinates() {
        let values = vec![f64::NAN, 1.0, 2.0, 3.0, f64::NAN, 5.0, 6.0, 7.0, 8.0];
        let lines = iso_lines(&values, 3, 3, &[4.0], |x, y| [x, y]).unwrap();
        for p in lines.iter().flat_map(|l| l.paths.iter().flatten()) {
            assert!(p[0].is_finite() && p[1].is_finite());
        }
    }
}
