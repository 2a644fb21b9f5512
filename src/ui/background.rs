//! Ambient background: slowly morphing blobs under a grain overlay
//!
//! Four blobs sit in a 100×100 view box. Each blob's outline is a ring of
//! points whose radii are perturbed by a sine "noise" keyed on a seed; over a
//! per-blob cycle the outline eases from one seed's shape to the next. The
//! outline is closed with a Catmull-Rom spline, emitted as cubic Bézier
//! segments for SVG or sampled into a polygon for the terminal raster.
//!
//! With reduced motion the background renders a single static frame and
//! ignores every later tick.

use std::f64::consts::PI;
use std::fmt::Write as _;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Side of the square view box
pub const VIEW_BOX: f64 = 100.0;

/// Page base color behind the blobs
pub const BASE_COLOR: Rgb = Rgb(250, 250, 248);

/// Fixed seed so the grain texture is identical across runs
pub const GRAIN_SEED: u64 = 0x6772_6169_6e;

/// Grain intensity as a fraction of full brightness
const GRAIN_STRENGTH: f32 = 0.03;

/// Spline samples per outline segment when rasterizing
const SAMPLES_PER_SEGMENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Alpha-composite `top` over `self`
    pub fn blend(self, top: Rgb, alpha: f32) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |under: u8, over: u8| -> u8 {
            (under as f32 + (over as f32 - under as f32) * alpha).round() as u8
        };
        Rgb(mix(self.0, top.0), mix(self.1, top.1), mix(self.2, top.2))
    }

    /// Shift brightness by `delta` (-1.0 to 1.0 of full scale)
    pub fn shade(self, delta: f32) -> Rgb {
        let shift = |channel: u8| -> u8 { (channel as f32 + delta * 255.0).round().clamp(0.0, 255.0) as u8 };
        Rgb(shift(self.0), shift(self.1), shift(self.2))
    }
}

/// Shape and timing of one blob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobConfig {
    /// Center, in view-box units
    pub cx: f64,
    pub cy: f64,
    /// Base radius, in view-box units
    pub radius: f64,
    /// Outline points
    pub points: usize,
    /// Maximum radius perturbation
    pub variance: f64,
    pub color: Rgb,
    pub opacity: f32,
    /// Length of one morph cycle
    pub cycle_ms: u64,
}

pub const BLOB_CONFIGS: [BlobConfig; 4] = [
    // Large warm shape, top left
    BlobConfig {
        cx: 15.0,
        cy: 20.0,
        radius: 35.0,
        points: 8,
        variance: 12.0,
        color: Rgb(231, 224, 214),
        opacity: 0.4,
        cycle_ms: 25_000,
    },
    // Sage, right side
    BlobConfig {
        cx: 85.0,
        cy: 45.0,
        radius: 30.0,
        points: 7,
        variance: 10.0,
        color: Rgb(207, 216, 204),
        opacity: 0.3,
        cycle_ms: 30_000,
    },
    // Forest accent, bottom
    BlobConfig {
        cx: 40.0,
        cy: 85.0,
        radius: 40.0,
        points: 9,
        variance: 15.0,
        color: Rgb(215, 227, 218),
        opacity: 0.25,
        cycle_ms: 35_000,
    },
    // Small amber accent, center
    BlobConfig {
        cx: 60.0,
        cy: 30.0,
        radius: 20.0,
        points: 6,
        variance: 8.0,
        color: Rgb(254, 243, 199),
        opacity: 0.2,
        cycle_ms: 20_000,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub fn ease_in_out_sine(t: f64) -> f64 {
    -((PI * t).cos() - 1.0) / 2.0
}

fn noise(seed: f64, i: usize, variance: f64) -> f64 {
    (seed * (i as f64 + 1.0) * 0.7).sin() * variance
}

/// Outline points, morphed `t` of the way from `seed_from` to `seed_to`
pub fn blob_outline(config: &BlobConfig, seed_from: f64, seed_to: f64, t: f64) -> Vec<Point> {
    let step = 2.0 * PI / config.points as f64;
    (0..config.points)
        .map(|i| {
            let from = noise(seed_from, i, config.variance);
            let to = noise(seed_to, i, config.variance);
            let r = config.radius + from + (to - from) * t;
            let angle = i as f64 * step;
            Point {
                x: config.cx + angle.cos() * r,
                y: config.cy + angle.sin() * r,
            }
        })
        .collect()
}

/// Bézier control points for the segment from `points[i]` to `points[i + 1]`
fn segment(points: &[Point], i: usize) -> (Point, Point, Point, Point) {
    let n = points.len();
    let p0 = points[(i + n - 1) % n];
    let p1 = points[i];
    let p2 = points[(i + 1) % n];
    let p3 = points[(i + 2) % n];
    let c1 = Point {
        x: p1.x + (p2.x - p0.x) / 6.0,
        y: p1.y + (p2.y - p0.y) / 6.0,
    };
    let c2 = Point {
        x: p2.x - (p3.x - p1.x) / 6.0,
        y: p2.y - (p3.y - p1.y) / 6.0,
    };
    (p1, c1, c2, p2)
}

/// Closed SVG path through `points` (Catmull-Rom as cubic Bézier)
pub fn bezier_path(points: &[Point]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut path = format!("M {:.2} {:.2}", first.x, first.y);
    for i in 0..points.len() {
        let (_, c1, c2, end) = segment(points, i);
        let _ = write!(
            path,
            " C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
            c1.x, c1.y, c2.x, c2.y, end.x, end.y
        );
    }
    path.push_str(" Z");
    path
}

/// Sample the closed spline into a polygon
pub fn sample_outline(points: &[Point]) -> Vec<Point> {
    let mut polygon = Vec::with_capacity(points.len() * SAMPLES_PER_SEGMENT);
    for i in 0..points.len() {
        let (p1, c1, c2, p2) = segment(points, i);
        for step in 0..SAMPLES_PER_SEGMENT {
            let t = step as f64 / SAMPLES_PER_SEGMENT as f64;
            let u = 1.0 - t;
            polygon.push(Point {
                x: u * u * u * p1.x + 3.0 * u * u * t * c1.x + 3.0 * u * t * t * c2.x + t * t * t * p2.x,
                y: u * u * u * p1.y + 3.0 * u * u * t * c1.y + 3.0 * u * t * t * c2.y + t * t * t * p2.y,
            });
        }
    }
    polygon
}

/// Even-odd point-in-polygon test
fn contains(polygon: &[Point], x: f64, y: f64) -> bool {
    let mut inside = false;
    let n = polygon.len();
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + n - 1) % n];
        if (a.y > y) != (b.y > y) && x < (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
    }
    inside
}

/// Outlines of every blob at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct BlobFrame {
    pub outlines: Vec<Vec<Point>>,
}

impl BlobFrame {
    /// The frame shown before animation starts and under reduced motion
    pub fn initial() -> Self {
        let outlines = BLOB_CONFIGS
            .iter()
            .enumerate()
            .map(|(index, config)| {
                let seed = index as f64 * 1.5 + 1.0;
                blob_outline(config, seed, seed, 0.0)
            })
            .collect();
        Self { outlines }
    }

    /// Frame `elapsed_ms` after the animation started
    pub fn at(elapsed_ms: u64) -> Self {
        let outlines = BLOB_CONFIGS
            .iter()
            .enumerate()
            .map(|(index, config)| {
                let cycle = elapsed_ms / config.cycle_ms;
                let progress = (elapsed_ms % config.cycle_ms) as f64 / config.cycle_ms as f64;
                let base = (index as f64 + 1.0) * 1.5;
                let seed_from = base + cycle as f64 * 0.3;
                let seed_to = base + (cycle + 1) as f64 * 0.3;
                blob_outline(config, seed_from, seed_to, ease_in_out_sine(progress))
            })
            .collect();
        Self { outlines }
    }

    pub fn paths(&self) -> Vec<String> {
        self.outlines.iter().map(|outline| bezier_path(outline)).collect()
    }

    /// Standalone SVG document for this frame
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {v} {v}" preserveAspectRatio="xMidYMid slice">"#,
            v = VIEW_BOX
        );
        let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, BASE_COLOR.hex());
        svg.push_str("  <defs>\n");
        svg.push_str(r#"    <filter id="ambient-blur" x="-50%" y="-50%" width="200%" height="200%">"#);
        svg.push('\n');
        svg.push_str(r#"      <feGaussianBlur in="SourceGraphic" stdDeviation="3"/>"#);
        svg.push('\n');
        svg.push_str("    </filter>\n  </defs>\n");
        svg.push_str("  <g filter=\"url(#ambient-blur)\">\n");
        for (config, path) in BLOB_CONFIGS.iter().zip(self.paths()) {
            let _ = writeln!(
                svg,
                r#"    <path d="{}" fill="{}" opacity="{}"/>"#,
                path,
                config.color.hex(),
                config.opacity
            );
        }
        svg.push_str("  </g>\n</svg>\n");
        svg
    }

    /// Rasterize into `width × height` cells, row-major, without grain
    pub fn rasterize(&self, width: u16, height: u16) -> Vec<Rgb> {
        let polygons: Vec<Vec<Point>> = self.outlines.iter().map(|outline| sample_outline(outline)).collect();
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            let y = (row as f64 + 0.5) / height.max(1) as f64 * VIEW_BOX;
            for col in 0..width {
                let x = (col as f64 + 0.5) / width.max(1) as f64 * VIEW_BOX;
                let color = BLOB_CONFIGS
                    .iter()
                    .zip(&polygons)
                    .filter(|(_, polygon)| contains(polygon, x, y))
                    .fold(BASE_COLOR, |under, (config, _)| under.blend(config.color, config.opacity));
                cells.push(color);
            }
        }
        cells
    }
}

/// Static per-cell brightness jitter, generated once per size
#[derive(Debug, Clone)]
pub struct GrainTexture {
    width: u16,
    height: u16,
    deltas: Vec<f32>,
}

impl GrainTexture {
    pub fn new(seed: u64, width: u16, height: u16) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let deltas = (0..width as usize * height as usize)
            .map(|_| rng.gen_range(-GRAIN_STRENGTH..=GRAIN_STRENGTH))
            .collect();
        Self { width, height, deltas }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn apply(&self, cells: &mut [Rgb]) {
        for (cell, delta) in cells.iter_mut().zip(&self.deltas) {
            *cell = cell.shade(*delta);
        }
    }
}

/// Animation driver owned by a page session
#[derive(Debug, Clone)]
pub struct AmbientBackground {
    reduced_motion: bool,
    frames_rendered: u64,
    current: Option<BlobFrame>,
}

impl AmbientBackground {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            frames_rendered: 0,
            current: None,
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Advance to `elapsed_ms`; returns the new frame when one was rendered
    ///
    /// Under reduced motion only the first call renders (the static frame).
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<&BlobFrame> {
        if self.reduced_motion {
            if self.current.is_some() {
                return None;
            }
            self.current = Some(BlobFrame::initial());
        } else {
            self.current = Some(BlobFrame::at(elapsed_ms));
        }
        self.frames_rendered += 1;
        self.current.as_ref()
    }

    /// Last rendered frame
    pub fn current(&self) -> Option<&BlobFrame> {
        self.current.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}
