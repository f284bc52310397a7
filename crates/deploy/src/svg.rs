//! Off-chain generative art: rose-curve SVG patterns.
//!
//! A rose is the set of points given in polar coordinates by
//! r = a*cos(k*theta) with k = n/d. Points are rendered as small circles
//! whose color is redrawn from a palette every few points, superimposed
//! over a square background.

use rand::Rng;

/// Point color used when the palette is empty.
const FALLBACK_COLOR: &str = "#ffffff";

/// Parameters for one rose pattern.
#[derive(Debug, Clone)]
pub struct RosePattern {
    pub name: String,
    /// Side length of the square image.
    pub img_length: u32,
    pub background_color: String,
    pub shape_colors: Vec<String>,
    pub point_radius: f64,
    /// Number of consecutive points drawn in the same color.
    pub color_line_length: u32,
    /// Angular step between points, in radians.
    pub step: f64,
}

impl Default for RosePattern {
    fn default() -> Self {
        Self {
            name: "rose_black_bg".to_string(),
            img_length: 1000,
            background_color: "#000000".to_string(),
            shape_colors: ["#44ffcc", "#bb7722", "#77bbee", "#9988cc", "#ff5566"]
                .map(String::from)
                .to_vec(),
            point_radius: 2.0,
            color_line_length: 20,
            step: 0.02,
        }
    }
}

impl RosePattern {
    fn background(&self) -> String {
        format!(
            r#"<rect x="{0}" y="{0}" width="{1}" height="{1}" fill="{2}"></rect>"#,
            -(self.img_length as i64),
            2 * self.img_length as i64,
            self.background_color
        )
    }

    fn pick_color<R: Rng>(&self, rng: &mut R) -> String {
        if self.shape_colors.is_empty() {
            return FALLBACK_COLOR.to_string();
        }
        self.shape_colors[rng.random_range(0..self.shape_colors.len())].clone()
    }

    /// The circle points of one rose with k = n/d.
    fn pattern<R: Rng>(&self, n: u32, d: u32, rng: &mut R) -> Vec<String> {
        let a = self.img_length as f64 / 2.0 - 20.0;
        let k = n as f64 / d as f64;

        let mut points = Vec::new();
        let mut same_color_run = 0u32;
        let mut color = self.pick_color(rng);

        // The full curve closes after d turns.
        let mut theta = 0.0f64;
        let end = 2.0 * std::f64::consts::PI * d as f64;
        while theta < end {
            let r = a * (k * theta).cos();
            let x = r * theta.cos();
            let y = r * theta.sin();
            points.push(format!(
                r#"<circle cx="{x}" cy="{y}" r="{}" fill="{color}"></circle>"#,
                self.point_radius
            ));

            theta += self.step;
            same_color_run += 1;
            if same_color_run >= self.color_line_length {
                same_color_run = 0;
                color = self.pick_color(rng);
            }
        }
        points
    }

    /// Render the pattern as a standalone SVG document: a background and
    /// two superimposed roses (k = 7/2 and k = 7/8).
    pub fn generate<R: Rng>(&self, rng: &mut R) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="{1} {1} {0} {0}">"#,
            self.img_length,
            -(self.img_length as f64) / 2.0
        );

        svg.push_str("\n\t");
        svg.push_str(&self.background());

        for shape in self.pattern(7, 2, rng) {
            svg.push_str("\n\t");
            svg.push_str(&shape);
        }
        for shape in self.pattern(7, 8, rng) {
            svg.push_str("\n\t");
            svg.push_str(&shape);
        }

        svg.push_str("\n</svg>");
        svg
    }
}
