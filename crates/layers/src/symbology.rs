use foundation::color::{Rgb, Rgba, opaque};

/// Discrete color ramp for normalized scores.
///
/// Bucketing contract:
/// - A missing score maps to the lowest bucket, never an error.
/// - Bucket index is `floor(score * (K - 1))`, clamped into `[0, K-1]`, so
///   out-of-range scores from noisy upstream data cannot index out of
///   bounds.
/// - The returned color is always fully opaque; stroke-vs-fill alpha is a
///   caller decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Clamped bucket index for a normalized score.
    pub fn bucket_index(&self, score: Option<f64>) -> usize {
        if self.colors.len() <= 1 {
            return 0;
        }
        let top = self.colors.len() as isize - 1;
        let raw = (score.unwrap_or(0.0) * top as f64).floor();
        // NaN casts to 0, so even a NaN score lands in the lowest bucket.
        (raw as isize).clamp(0, top) as usize
    }

    pub fn score_color(&self, score: Option<f64>) -> Rgba {
        let Some(&rgb) = self.colors.get(self.bucket_index(score)) else {
            // Empty palettes degrade to black rather than panic.
            return opaque([0, 0, 0]);
        };
        opaque(rgb)
    }

    /// Percentage labels for a legend swatch row, lowest bucket first.
    pub fn legend_percent_labels(&self) -> Vec<String> {
        let top = (self.colors.len().saturating_sub(1)).max(1) as f64;
        (0..self.colors.len())
            .map(|i| format!("{}%", (i as f64 / top * 100.0).round() as i64))
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        robotability_ramp()
    }
}

/// The 11-step red-to-green robotability ramp (low percentile to high).
pub fn robotability_ramp() -> Palette {
    Palette::new(vec![
        [165, 0, 38],
        [215, 48, 39],
        [244, 109, 67],
        [253, 174, 97],
        [254, 224, 144],
        [255, 255, 191],
        [217, 239, 139],
        [166, 217, 106],
        [102, 189, 99],
        [26, 152, 80],
        [0, 104, 55],
    ])
}
