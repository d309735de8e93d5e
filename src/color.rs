use eframe::egui::Color32;
use palette::{LinSrgb, Mix};

// ---------------------------------------------------------------------------
// Sequential colour ramp (viridis-like)
// ---------------------------------------------------------------------------

/// Anchor colours of the ramp, dark purple → yellow.
const STOPS: [(f32, f32, f32); 6] = [
    (0.267, 0.005, 0.329),
    (0.254, 0.265, 0.530),
    (0.164, 0.471, 0.558),
    (0.135, 0.659, 0.518),
    (0.478, 0.821, 0.318),
    (0.993, 0.906, 0.144),
];

/// Sample the ramp at `t` in [0, 1].
pub fn sample(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (STOPS.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(STOPS.len() - 2);
    let frac = scaled - i as f32;

    let (r0, g0, b0) = STOPS[i];
    let (r1, g1, b1) = STOPS[i + 1];
    let rgb = LinSrgb::new(r0, g0, b0).mix(LinSrgb::new(r1, g1, b1), frac);

    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Value → colour mapping for bars and choropleth fills
// ---------------------------------------------------------------------------

/// Maps a numeric range onto the ramp. Values outside the range clamp to the
/// ends; missing data gets a neutral grey.
#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    min: f64,
    max: f64,
}

impl ColorRamp {
    pub fn new(min: f64, max: f64) -> Self {
        ColorRamp { min, max }
    }

    /// Ramp spanning the values of an aggregation result.
    pub fn from_values<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }
        if min > max {
            // No values at all; any range works, colours default to the low end.
            return ColorRamp::new(0.0, 1.0);
        }
        ColorRamp::new(min, max)
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return sample(0.5);
        }
        sample(((value - self.min) / range) as f32)
    }

    /// Fill colour for shapes with no backing data.
    pub fn missing(&self) -> Color32 {
        Color32::GRAY
    }
}
