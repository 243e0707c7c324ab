use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55).into_color())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential ramp for heatmaps and contour levels
// ---------------------------------------------------------------------------

/// Stops of the yellow → green → blue ramp.
const YL_GN_BU: [(u8, u8, u8); 9] = [
    (255, 255, 217),
    (237, 248, 177),
    (199, 233, 180),
    (127, 205, 187),
    (65, 182, 196),
    (29, 145, 192),
    (34, 94, 168),
    (37, 52, 148),
    (8, 29, 88),
];

fn stop(i: usize) -> LinSrgb {
    let (r, g, b) = YL_GN_BU[i];
    Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0).into_color()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Colour for `t` in `[0, 1]` on the YlGnBu ramp. NaN maps to transparent.
pub fn sequential(t: f64) -> Color32 {
    if t.is_nan() {
        return Color32::TRANSPARENT;
    }
    let scaled = t.clamp(0.0, 1.0) as f32 * (YL_GN_BU.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(YL_GN_BU.len() - 2);
    let mixed = stop(lower).mix(stop(lower + 1), scaled - lower as f32);
    to_color32(mixed.into_color())
}

/// Map `value` within `(lo, hi)` onto the sequential ramp.
pub fn sequential_in(value: f64, (lo, hi): (f64, f64)) -> Color32 {
    if hi > lo {
        sequential((value - lo) / (hi - lo))
    } else {
        sequential(0.5)
    }
}
