use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, MarkerShape, Plot,
    PlotPoint, PlotPoints, PlotUi, Points, Polygon, Text,
};

use crate::chart::{
    BarItem, Bin2d, BoxItem, Chart, ChartBody, IsoLine, PieSlice, ViolinItem,
};
use crate::color::{generate_palette, sequential_in};
use crate::data::pivot::Grid;

/// Height of the chart area in points.
pub const CHART_HEIGHT: f32 = 420.0;

// ---------------------------------------------------------------------------
// Chart display (central panel)
// ---------------------------------------------------------------------------

/// Draw a generated chart: its title, then the plot.
pub fn chart_plot(ui: &mut Ui, chart: &Chart) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(&chart.title).strong().size(16.0));
    });

    let mut plot = Plot::new("chart_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if !chart.x_categories.is_empty() {
        plot = plot.x_axis_formatter(category_formatter(chart.x_categories.clone()));
    }
    if !chart.y_categories.is_empty() {
        plot = plot.y_axis_formatter(category_formatter(chart.y_categories.clone()));
    }
    if matches!(chart.body, ChartBody::Pie { .. }) {
        plot = plot
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .include_x(-1.5)
            .include_x(1.5)
            .include_y(-1.3)
            .include_y(1.3);
    }

    plot.show(ui, |plot_ui| match &chart.body {
        ChartBody::Line { points } => {
            plot_ui.line(
                Line::new(PlotPoints::new(points.clone()))
                    .name(&chart.y_label)
                    .width(1.5),
            );
        }
        ChartBody::Scatter { points } => {
            plot_ui.points(
                Points::new(PlotPoints::new(points.clone()))
                    .name(&chart.y_label)
                    .radius(3.0)
                    .shape(MarkerShape::Circle),
            );
        }
        ChartBody::Area { points } => {
            plot_ui.line(
                Line::new(PlotPoints::new(points.clone()))
                    .name(&chart.y_label)
                    .fill(0.0_f32)
                    .width(1.5),
            );
        }
        ChartBody::Bars { bars } => draw_bars(plot_ui, bars),
        ChartBody::Histogram {
            bins,
            max_count,
            density,
        } => draw_histogram(plot_ui, bins, *max_count, density),
        ChartBody::Boxes { boxes } => draw_boxes(plot_ui, boxes),
        ChartBody::Pie { slices } => draw_pie(plot_ui, slices),
        ChartBody::Contour { lines, value_range } => {
            for line in lines {
                draw_iso_line(plot_ui, line, sequential_in(line.level, *value_range), 1.5);
            }
        }
        ChartBody::Heatmap { grid, value_range } => draw_heatmap(plot_ui, grid, *value_range),
        ChartBody::Violins { violins } => draw_violins(plot_ui, violins),
    });
}

/// Tick labels for category positions; blank between integer positions.
fn category_formatter(
    categories: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        categories
            .get(rounded as usize)
            .cloned()
            .unwrap_or_default()
    }
}

fn rect(x: [f64; 2], y: [f64; 2]) -> PlotPoints<'static> {
    PlotPoints::new(vec![[x[0], y[0]], [x[1], y[0]], [x[1], y[1]], [x[0], y[1]]])
}

// ---------------------------------------------------------------------------
// Per-kind drawing
// ---------------------------------------------------------------------------

fn draw_bars(plot_ui: &mut PlotUi, bars: &[BarItem]) {
    let palette = generate_palette(bars.len());
    let items = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(b.position, b.height)
                .width(0.8)
                .name(&b.label)
                .fill(palette[i])
        })
        .collect();
    plot_ui.bar_chart(BarChart::new(items));
}

fn draw_histogram(plot_ui: &mut PlotUi, bins: &[Bin2d], max_count: usize, density: &[IsoLine]) {
    let range = (0.0, max_count as f64);
    for bin in bins {
        let color = sequential_in(bin.count as f64, range);
        plot_ui.polygon(
            Polygon::new(rect(bin.x, bin.y))
                .fill_color(color)
                .stroke(Stroke::new(0.5, color)),
        );
    }
    for line in density {
        draw_iso_line(plot_ui, line, Color32::from_rgb(31, 119, 180), 1.2);
    }
}

fn draw_iso_line(plot_ui: &mut PlotUi, line: &IsoLine, color: Color32, width: f32) {
    let name = format!("{:.3}", line.level);
    for path in &line.paths {
        plot_ui.line(
            Line::new(PlotPoints::new(path.clone()))
                .color(color)
                .width(width)
                .name(&name),
        );
    }
}

fn draw_boxes(plot_ui: &mut PlotUi, boxes: &[BoxItem]) {
    let palette = generate_palette(boxes.len());
    let elems = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let s = &b.stats;
            BoxElem::new(
                b.position,
                BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
            )
            .name(&b.label)
            .box_width(0.6)
            .fill(palette[i].linear_multiply(0.6))
        })
        .collect();
    plot_ui.box_plot(BoxPlot::new(elems));

    for b in boxes {
        if b.stats.outliers.is_empty() {
            continue;
        }
        let points: Vec<[f64; 2]> = b.stats.outliers.iter().map(|v| [b.position, *v]).collect();
        plot_ui.points(
            Points::new(PlotPoints::new(points))
                .shape(MarkerShape::Diamond)
                .radius(3.0)
                .color(Color32::GRAY),
        );
    }
}

fn draw_pie(plot_ui: &mut PlotUi, slices: &[PieSlice]) {
    const LABEL_DISTANCE: f64 = 1.1;
    const PCT_DISTANCE: f64 = 0.6;

    let palette = generate_palette(slices.len());
    for (slice, &color) in slices.iter().zip(&palette) {
        let sweep = slice.end_deg - slice.start_deg;
        let steps = ((sweep / 2.0).ceil() as usize).max(1);

        let mut wedge = vec![[0.0, 0.0]];
        wedge.extend((0..=steps).map(|k| {
            let a = (slice.start_deg + sweep * k as f64 / steps as f64).to_radians();
            [a.cos(), a.sin()]
        }));
        plot_ui.polygon(
            Polygon::new(PlotPoints::new(wedge))
                .name(&slice.label)
                .fill_color(color)
                .stroke(Stroke::new(1.0, Color32::WHITE)),
        );

        let mid = ((slice.start_deg + slice.end_deg) / 2.0).to_radians();
        let (c, s) = (mid.cos(), mid.sin());
        plot_ui.text(Text::new(
            PlotPoint::new(c * LABEL_DISTANCE, s * LABEL_DISTANCE),
            slice.label.clone(),
        ));
        plot_ui.text(Text::new(
            PlotPoint::new(c * PCT_DISTANCE, s * PCT_DISTANCE),
            RichText::new(&slice.pct_label).color(Color32::BLACK),
        ));
    }
}

fn draw_heatmap(plot_ui: &mut PlotUi, grid: &Grid, value_range: (f64, f64)) {
    for (iy, row) in grid.values.iter().enumerate() {
        for (ix, value) in row.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let (x, y) = (ix as f64, iy as f64);
            let color = sequential_in(*value, value_range);
            plot_ui.polygon(
                Polygon::new(rect([x - 0.5, x + 0.5], [y - 0.5, y + 0.5]))
                    .fill_color(color)
                    .stroke(Stroke::new(0.0, color)),
            );
        }
    }
}

fn draw_violins(plot_ui: &mut PlotUi, violins: &[ViolinItem]) {
    const HALF_WIDTH: f64 = 0.4;

    let palette = generate_palette(violins.len());
    for (v, &color) in violins.iter().zip(&palette) {
        let x = v.position;

        if let [[value, _]] = v.profile.as_slice() {
            plot_ui.line(
                Line::new(PlotPoints::new(vec![[x - HALF_WIDTH, *value], [x + HALF_WIDTH, *value]]))
                    .color(color)
                    .width(2.0)
                    .name(&v.label),
            );
            continue;
        }

        let max_density = v.profile.iter().map(|p| p[1]).fold(0.0, f64::max);
        if max_density <= 0.0 {
            continue;
        }
        let mut outline: Vec<[f64; 2]> = v
            .profile
            .iter()
            .map(|[y, d]| [x + d / max_density * HALF_WIDTH, *y])
            .collect();
        outline.extend(
            v.profile
                .iter()
                .rev()
                .map(|[y, d]| [x - d / max_density * HALF_WIDTH, *y]),
        );
        plot_ui.polygon(
            Polygon::new(PlotPoints::new(outline))
                .name(&v.label)
                .fill_color(color.linear_multiply(0.3))
                .stroke(Stroke::new(1.5, color)),
        );

        // Inner quartile box, median tick and whiskers.
        let box_half = HALF_WIDTH * 0.15;
        let s = &v.stats;
        plot_ui.polygon(
            Polygon::new(rect([x - box_half, x + box_half], [s.q1, s.q3]))
                .fill_color(Color32::DARK_GRAY)
                .stroke(Stroke::new(1.0, Color32::DARK_GRAY)),
        );
        plot_ui.line(
            Line::new(PlotPoints::new(vec![[x, s.lower_whisker], [x, s.upper_whisker]]))
                .color(Color32::DARK_GRAY)
                .width(1.0),
        );
        plot_ui.points(
            Points::new(PlotPoints::new(vec![[x, s.median]]))
                .color(Color32::WHITE)
                .radius(3.0)
                .shape(MarkerShape::Circle),
        );
    }
}

/// Placeholder shown before any chart exists.
pub fn empty_plot(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("Pick a file, both axes and a plot type, then press Generate Plot")
                .weak(),
        );
    });
    ui.add_space(8.0);
}
