//! Statistical helpers shared by the chart builders.

use crate::data::summary::{quantile, sample_std};

const SQRT_2PI: f64 = 2.5066282746310002;

/// Five-number box summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers.
    pub outliers: Vec<f64>,
}

/// Box summary of a non-empty slice.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let inside = || sorted.iter().copied().filter(|v| *v >= lower_fence && *v <= upper_fence);
    let lower_whisker = inside().next().unwrap_or(q1);
    let upper_whisker = inside().last().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

/// Scott's rule bandwidth for `dims`-dimensional data: `std * n^(-1/(d+4))`.
/// Returns `None` when the spread is zero or undefined.
pub fn scott_bandwidth(values: &[f64], dims: usize) -> Option<f64> {
    let std = sample_std(values);
    if !std.is_finite() || std <= 0.0 {
        return None;
    }
    Some(std * (values.len() as f64).powf(-1.0 / (dims as f64 + 4.0)))
}

/// Gaussian kernel density of `values` evaluated on `gridsize` points
/// spanning `cut` bandwidths beyond the data. Returns `(value, density)`.
pub fn kde_profile(values: &[f64], gridsize: usize, cut: f64) -> Option<Vec<[f64; 2]>> {
    let bw = scott_bandwidth(values, 1)?;
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - cut * bw;
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + cut * bw;
    let n = values.len() as f64;
    let steps = gridsize.max(2) - 1;

    Some(
        (0..=steps)
            .map(|i| {
                let x = lo + (hi - lo) * i as f64 / steps as f64;
                let density = values
                    .iter()
                    .map(|v| {
                        let u = (x - v) / bw;
                        (-0.5 * u * u).exp() / (SQRT_2PI * bw)
                    })
                    .sum::<f64>()
                    / n;
                [x, density]
            })
            .collect(),
    )
}

/// A regular grid of density values over a rectangle.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    pub origin: [f64; 2],
    pub step: [f64; 2],
    pub nx: usize,
    pub ny: usize,
    /// Row-major: `values[iy * nx + ix]`.
    pub values: Vec<f64>,
}

/// Bivariate Gaussian KDE with per-axis Scott bandwidths on an
/// `size` × `size` grid covering the data plus three bandwidths.
pub fn kde_2d(xs: &[f64], ys: &[f64], size: usize) -> Option<DensityGrid> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let bx = scott_bandwidth(xs, 2)?;
    let by = scott_bandwidth(ys, 2)?;
    let size = size.max(2);

    let span = |vals: &[f64], bw: f64| {
        let lo = vals.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * bw;
        let hi = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bw;
        (lo, (hi - lo) / (size - 1) as f64)
    };
    let (x0, dx) = span(xs, bx);
    let (y0, dy) = span(ys, by);
    let norm = xs.len() as f64 * SQRT_2PI * SQRT_2PI * bx * by;

    let mut values = Vec::with_capacity(size * size);
    for iy in 0..size {
        let gy = y0 + dy * iy as f64;
        for ix in 0..size {
            let gx = x0 + dx * ix as f64;
            let sum: f64 = xs
                .iter()
                .zip(ys)
                .map(|(x, y)| {
                    let u = (gx - x) / bx;
                    let v = (gy - y) / by;
                    (-0.5 * (u * u + v * v)).exp()
                })
                .sum();
            values.push(sum / norm);
        }
    }

    Some(DensityGrid {
        origin: [x0, y0],
        step: [dx, dy],
        nx: size,
        ny: size,
        values,
    })
}

/// Lower edges of `bins` equal-width bins over the values, plus the width.
/// A zero-width range is widened by 0.5 on each side.
pub fn bin_edges(values: &[f64], bins: usize) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    (lo, (hi - lo) / bins.max(1) as f64)
}

/// Bin index of `v`; the top edge belongs to the last bin.
pub fn bin_index(v: f64, lo: f64, width: f64, bins: usize) -> usize {
    (((v - lo) / width).floor() as usize).min(bins.max(1) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_stats_flags_outliers() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.upper_whisker, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(box_stats(&[]).is_none());
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 5.0];
        let profile = kde_profile(&values, 200, 3.0).unwrap();
        let step = profile[1][0] - profile[0][0];
        let area: f64 = profile.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area = {area}");
    }

    #[test]
    fn constant_data_has_no_bandwidth() {
        assert!(scott_bandwidth(&[2.0, 2.0, 2.0], 1).is_none());
        assert!(kde_profile(&[4.0], 10, 2.0).is_none());
    }

    #[test]
    fn density_grid_peaks_near_the_data() {
        let xs = [0.0, 1.0, -1.0, 0.0, 0.0];
        let ys = [0.0, 0.0, 0.0, 1.0, -1.0];
        let grid = kde_2d(&xs, &ys, 21).unwrap();
        let (peak, _) = grid
            .values
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        assert_eq!(peak, 10 * 21 + 10);
    }

    #[test]
    fn binning_keeps_maximum_in_last_bin() {
        let (lo, width) = bin_edges(&[0.0, 10.0], 5);
        assert_eq!((lo, width), (0.0, 2.0));
        assert_eq!(bin_index(10.0, lo, width, 5), 4);
        assert_eq!(bin_index(3.9, lo, width, 5), 1);
        assert_eq!(bin_edges(&[3.0, 3.0], 4), (2.5, 0.25));
    }
}
