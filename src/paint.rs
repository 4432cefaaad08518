use image::RgbaImage;
use rand::Rng;

use crate::{
    chain::uniform,
    geom::{Point, heading_deg, heading_vec},
    noise_field::NoiseSource,
    pipeline::CloudPaths,
    raster,
};

/// Style knobs for the stippled rendering, passed explicitly rather than
/// kept in shared state.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct SketchStyle {
    pub ink: [u8; 3],
    pub paper: u8,
    /// Dot diameter range in pixels; actual size is noise-modulated.
    pub dot_size: (f64, f64),
    /// Dots per unit of stippled line length.
    pub dot_density: f64,
    /// Vertical hatch/shade lines per unit width.
    pub line_density: f64,
    pub line_waving_length: f64,
    pub line_wave_noise_scale: f64,
    pub line_size_noise_scale: f64,
    /// 1D noise walk driving the per-point jitter.
    pub point_noise_scale_x: f64,
    pub point_noise_radius: f64,
}

impl Default for SketchStyle {
    fn default() -> Self {
        Self {
            ink: [15, 71, 140],
            paper: 240,
            dot_size: (1.0, 3.0),
            dot_density: 0.8,
            line_density: 0.15,
            line_waving_length: 3.0,
            line_wave_noise_scale: 0.02,
            line_size_noise_scale: 0.02,
            point_noise_scale_x: 0.06,
            point_noise_radius: 3.0,
        }
    }
}

impl SketchStyle {
    /// Per-run variation drawn once at setup.
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            dot_density: uniform(rng, 0.5, 0.8),
            line_density: uniform(rng, 0.06, 0.2),
            line_wave_noise_scale: uniform(rng, 0.02, 0.12),
            ..Self::default()
        }
    }
}

/// Stateful stippler: dotted strokes with noise-modulated dot sizes, a
/// waver perpendicular to travel, and a 1D jitter walk for single points.
pub struct Painter<'a, R: Rng + ?Sized> {
    img: &'a mut RgbaImage,
    style: SketchStyle,
    field: &'a dyn NoiseSource,
    rng: &'a mut R,
    point_noise_x: f64,
}

/// Noise z-planes keeping dot size and waver decorrelated.
const SIZE_PLANE: f64 = 666.0;
const WAVE_PLANE: f64 = 999.0;

impl<'a, R: Rng + ?Sized> Painter<'a, R> {
    pub fn new(
        img: &'a mut RgbaImage,
        style: SketchStyle,
        field: &'a dyn NoiseSource,
        rng: &'a mut R,
    ) -> Self {
        Self {
            img,
            style,
            field,
            rng,
            point_noise_x: 0.0,
        }
    }

    fn dot_diameter(&self, x: f64, y: f64, (lo, hi): (f64, f64)) -> f64 {
        let s = self.style.line_size_noise_scale;
        let n = self.field.sample3(x * s, y * s, SIZE_PLANE);
        lo + (hi - lo) * n
    }

    /// Stippled line from `p1` to `p2`, dot diameters drawn from `dot_size`.
    pub fn dotted_line(&mut self, p1: Point, p2: Point, dot_size: (f64, f64)) {
        let dot_count = p1.distance(p2) * self.style.dot_density;
        if dot_count < 1.0 {
            return;
        }
        // Waver pushes dots sideways off the ruled line.
        let waver = heading_vec(heading_deg(p1, p2) - 90.0);

        let mut i = 0.0;
        while i < dot_count {
            let t = i / dot_count;
            let mut pos = p1.lerp(p2, t);

            let s = self.style.line_wave_noise_scale;
            let wave = self.field.sample3(pos.x * s, pos.y * s, WAVE_PLANE);
            let diameter = self.dot_diameter(pos.x, pos.y, dot_size);
            pos += waver * (self.style.line_waving_length * wave);

            let alpha = uniform(self.rng, 0.3, 0.6);
            raster::dot(self.img, pos.x, pos.y, diameter, self.style.ink, alpha);
            i += 1.0;
        }
    }

    /// Vertical dotted-line hatching across a rectangle.
    pub fn dotted_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let lines = width * self.style.line_density;
        if lines < 2.0 {
            return;
        }
        let spacing = width / (lines - 1.0);
        let mut i = 0.0;
        while i < lines {
            let lx = x + i * spacing;
            self.dotted_line(
                Point::new(lx, y),
                Point::new(lx, y + height),
                self.style.dot_size,
            );
            i += 1.0;
        }
    }

    /// One jittered stipple dot; the jitter walks a 1D noise line so nearby
    /// calls wander rather than scatter.
    pub fn noise_point(&mut self, p: Point, scaler: f64, alpha: f64) {
        self.point_noise_x += self.style.point_noise_scale_x;
        let offset_y =
            (self.field.sample1(self.point_noise_x) - 0.5) * 2.0 * self.style.point_noise_radius;
        let diameter = self.dot_diameter(p.x, p.y, self.style.dot_size) * scaler;
        raster::dot(
            self.img,
            p.x,
            p.y + offset_y,
            diameter,
            self.style.ink,
            alpha,
        );
    }

    /// Erases everything below the outline with paper-colored columns, so a
    /// nearer cloud masks the layers behind it.
    fn fill_below(&mut self, outline: &[Point], bottom: f64) {
        let paper = [self.style.paper; 3];
        for p in outline {
            raster::vline(self.img, p.x, p.y, bottom, paper);
        }
    }

    /// Stipples along the outline, gated by a 1D noise walk: stretches of
    /// edge drop out entirely, and re-entries fade in.
    fn stipple_edge(&mut self, outline: &[Point], padding: f64, force_full: bool) {
        let mut nx = uniform(self.rng, -1000.0, 1000.0);
        let scale = uniform(self.rng, 0.003, 0.02);
        let chance = if force_full {
            1.0
        } else {
            uniform(self.rng, 0.6, 0.8)
        };

        let width = f64::from(self.img.width());
        for p in outline {
            if p.x < padding || p.x > width - padding {
                continue;
            }
            nx += scale;
            let n = self.field.sample1(nx);
            if n >= chance {
                continue;
            }
            let t = 1.0 - n / chance;
            let scaler = if t < 0.2 { t / 0.2 } else { 1.0 };
            let alpha = uniform(self.rng, 0.4, 0.8);
            self.noise_point(*p, scaler, alpha);
        }
    }

    /// Dotted lines hanging from the outline down to the frame, suggesting
    /// rain shafts under the cloud.
    fn shade_lines(&mut self, outline: &[Point], padding: f64) {
        let hang = uniform(self.rng, 60.0, 200.0);
        let mut nx = uniform(self.rng, -1000.0, 1000.0);
        let nscale = 0.03;
        let spacing = (1.0 / self.style.line_density).floor().max(1.0) as i64;

        let width = f64::from(self.img.width());
        let bottom = f64::from(self.img.height()) - padding;
        for p in outline {
            if (p.x.floor() as i64).rem_euclid(spacing) != 0 {
                continue;
            }
            if p.x < padding || p.x > width - padding {
                continue;
            }
            nx += nscale;
            let y = p.y + hang * self.field.sample1(nx);
            if uniform(self.rng, 0.0, 1.0) < 0.9 {
                self.dotted_line(Point::new(p.x, y), Point::new(p.x, bottom), self.style.dot_size);
            }
        }
    }
}

/// Paints the full illustration: hatched backdrop, dotted frame, then each
/// cloud silhouette masked over the ones behind it, with the nearest cloud
/// re-painted over the frame last.
pub fn paint_scene<R: Rng + ?Sized>(
    clouds: &CloudPaths,
    width: u32,
    height: u32,
    style: SketchStyle,
    field: &dyn NoiseSource,
    rng: &mut R,
) -> RgbaImage {
    let mut img = raster::blank(width, height, style.paper);
    let w = f64::from(width);
    let h = f64::from(height);
    let padding = 0.06 * w.min(h);
    let frame_dots = (0.0, 6.0);

    let mut painter = Painter::new(&mut img, style, field, rng);

    painter.dotted_rect(padding, padding, w - padding * 2.0, h - padding * 2.0);
    painter.dotted_line(
        Point::new(padding, padding),
        Point::new(w - padding, padding),
        frame_dots,
    );

    let last = clouds.outlines.len().saturating_sub(1);
    for (i, outline) in clouds.outlines.iter().enumerate() {
        painter.fill_below(outline, h);
        painter.stipple_edge(outline, padding, i == 0);
        if i == last {
            break;
        }
        painter.shade_lines(outline, padding);
    }

    painter.dotted_line(
        Point::new(padding, padding),
        Point::new(padding, h - padding),
        frame_dots,
    );
    painter.dotted_line(
        Point::new(w - padding, padding),
        Point::new(w - padding, h - padding),
        frame_dots,
    );
    painter.dotted_line(
        Point::new(padding, h - padding),
        Point::new(w - padding, h - padding),
        frame_dots,
    );

    // The nearest cloud sits in front of the frame.
    if let Some(outline) = clouds.outlines.last() {
        painter.fill_below(outline, h);
        painter.stipple_edge(outline, padding, true);
        painter.shade_lines(outline, padding);
    }

    img
}
