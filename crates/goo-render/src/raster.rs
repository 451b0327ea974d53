//! Software rasterizer for [`Scene`]s.
//!
//! Pixels are premultiplied RGBA in `0.0..=1.0`. Filter semantics follow
//! SVG: blurs treat everything outside the canvas as transparent black,
//! color matrices operate on straight alpha, and composites use the
//! Porter-Duff operators.

use std::collections::HashMap;

use goo_core::Rgba;
use tracing::trace;

use crate::scene::{Circle, CompositeOperator, Filter, FilterInput, FilterPrimitive, Scene};

/// Viewport width, in pixels, that filter radii are authored against.
pub const REFERENCE_WIDTH: f32 = 1000.0;

/// A premultiplied RGBA image.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: usize,
    height: usize,
    data: Vec<[f32; 4]>,
}

impl Pixmap {
    /// Create a transparent pixmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 4]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Premultiplied pixel, or transparent outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            [0.0; 4]
        }
    }

    /// Straight-alpha color of a pixel.
    pub fn color(&self, x: usize, y: usize) -> Rgba {
        let [r, g, b, a] = self.pixel(x, y);
        if a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        Rgba::new(r / a, g / a, b / a, a)
    }

    /// Paint an anti-aliased circle source-over.
    pub fn fill_circle(&mut self, circle: &Circle) {
        let (w, h) = (self.width as f32, self.height as f32);
        let diagonal = ((w * w + h * h) / 2.0).sqrt();
        let cx = circle.cx.resolve(w);
        let cy = circle.cy.resolve(h);
        let r = circle.r.resolve(diagonal);
        if r <= 0.0 || circle.fill.a <= 0.0 {
            return;
        }

        let x0 = (cx - r - 1.0).floor().max(0.0) as usize;
        let y0 = (cy - r - 1.0).floor().max(0.0) as usize;
        let x1 = ((cx + r + 1.0).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((cy + r + 1.0).ceil().max(0.0) as usize).min(self.height);

        let Rgba { r: cr, g: cg, b: cb, a: ca } = circle.fill;
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let coverage = (r - (dx * dx + dy * dy).sqrt() + 0.5).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let alpha = ca * coverage;
                let src = [cr * alpha, cg * alpha, cb * alpha, alpha];
                let dst = &mut self.data[y * self.width + x];
                *dst = over(src, *dst);
            }
        }
    }

    /// Gaussian blur approximated by three box blurs per axis.
    pub fn blur(&self, std_dev: f32) -> Pixmap {
        let mut out = self.clone();
        for size in box_sizes(std_dev) {
            let radius = (size - 1) / 2;
            if radius == 0 {
                continue;
            }
            out = out.box_blur_horizontal(radius).box_blur_vertical(radius);
        }
        out
    }

    fn box_blur_horizontal(&self, radius: usize) -> Pixmap {
        let mut out = Pixmap::new(self.width, self.height);
        let norm = (2 * radius + 1) as f32;
        let mut prefix = vec![[0.0f32; 4]; self.width + 1];
        for y in 0..self.height {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            for (x, px) in row.iter().enumerate() {
                prefix[x + 1] = add(prefix[x], *px);
            }
            for x in 0..self.width {
                let lo = x.saturating_sub(radius);
                let hi = (x + radius + 1).min(self.width);
                out.data[y * self.width + x] = scale(sub(prefix[hi], prefix[lo]), 1.0 / norm);
            }
        }
        out
    }

    fn box_blur_vertical(&self, radius: usize) -> Pixmap {
        let mut out = Pixmap::new(self.width, self.height);
        let norm = (2 * radius + 1) as f32;
        let mut prefix = vec![[0.0f32; 4]; self.height + 1];
        for x in 0..self.width {
            for y in 0..self.height {
                prefix[y + 1] = add(prefix[y], self.data[y * self.width + x]);
            }
            for y in 0..self.height {
                let lo = y.saturating_sub(radius);
                let hi = (y + radius + 1).min(self.height);
                out.data[y * self.width + x] = scale(sub(prefix[hi], prefix[lo]), 1.0 / norm);
            }
        }
        out
    }

    /// Apply a 4x5 color matrix on straight alpha.
    pub fn color_matrix(&self, m: &[f32; 20]) -> Pixmap {
        let data = self
            .data
            .iter()
            .map(|&[r, g, b, a]| {
                let s = if a > 0.0 {
                    [r / a, g / a, b / a, a]
                } else {
                    [0.0; 4]
                };
                let row = |i: usize| {
                    (m[i * 5] * s[0]
                        + m[i * 5 + 1] * s[1]
                        + m[i * 5 + 2] * s[2]
                        + m[i * 5 + 3] * s[3]
                        + m[i * 5 + 4])
                        .clamp(0.0, 1.0)
                };
                let alpha = row(3);
                [row(0) * alpha, row(1) * alpha, row(2) * alpha, alpha]
            })
            .collect();
        Pixmap {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Porter-Duff composite of `self` (source) with `backdrop`.
    pub fn composite(&self, backdrop: &Pixmap, operator: CompositeOperator) -> Pixmap {
        let data = self
            .data
            .iter()
            .zip(&backdrop.data)
            .map(|(&a, &b)| match operator {
                CompositeOperator::Over => over(a, b),
                CompositeOperator::In => scale(a, b[3]),
                CompositeOperator::Atop => add(scale(a, b[3]), scale(b, 1.0 - a[3])),
            })
            .collect();
        Pixmap {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Multiply every pixel by the luminance-times-alpha of `mask`.
    pub fn apply_mask(&self, mask: &Pixmap) -> Pixmap {
        let data = self
            .data
            .iter()
            .zip(&mask.data)
            .map(|(&px, &[r, g, b, _])| {
                // Premultiplied channels already carry the mask alpha.
                let coverage = 0.2125 * r + 0.7154 * g + 0.0721 * b;
                scale(px, coverage.clamp(0.0, 1.0))
            })
            .collect();
        Pixmap {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

fn add(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]]
}

fn sub(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]]
}

fn scale(a: [f32; 4], k: f32) -> [f32; 4] {
    [a[0] * k, a[1] * k, a[2] * k, a[3] * k]
}

fn over(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    add(src, scale(dst, 1.0 - src[3]))
}

/// Odd box widths whose three passes approximate a Gaussian of `std_dev`.
fn box_sizes(std_dev: f32) -> [usize; 3] {
    if std_dev <= 0.0 {
        return [1; 3];
    }
    let n = 3.0f32;
    let ideal = (12.0 * std_dev * std_dev / n + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let lf = lower as f32;
    let split = ((12.0 * std_dev * std_dev - n * lf * lf - 4.0 * n * lf - 3.0 * n)
        / (-4.0 * lf - 4.0))
        .round()
        .max(0.0) as usize;
    std::array::from_fn(|i| if i < split { lower as usize } else { upper as usize })
}

/// Rasterization settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    pub width: usize,
    pub height: usize,
}

impl RasterOptions {
    /// Raster pixels per reference pixel.
    fn px_scale(&self) -> f32 {
        self.width as f32 / REFERENCE_WIDTH
    }
}

/// Rasterize a scene: paint the circles, apply the mask, then the frame filter.
pub fn rasterize(scene: &Scene, options: RasterOptions) -> Pixmap {
    let RasterOptions { width, height } = options;
    trace!(width, height, circles = scene.circles.len(), "rasterizing scene");
    let mut layer = Pixmap::new(width, height);
    for circle in &scene.circles {
        layer.fill_circle(circle);
    }

    if let Some(mask) = &scene.mask {
        let mut content = Pixmap::new(width, height);
        for circle in &mask.circles {
            content.fill_circle(circle);
        }
        if let Some(filter) = mask.filter.and_then(|id| scene.find_filter(id)) {
            content = apply_filter(filter, &content, options.px_scale());
        }
        layer = layer.apply_mask(&content);
    }

    match scene.filter.and_then(|id| scene.find_filter(id)) {
        Some(filter) => apply_filter(filter, &layer, options.px_scale()),
        None => layer,
    }
}

/// Run a filter chain over `source`.
///
/// Unknown result names read as transparent, matching how browsers treat
/// dangling references.
pub fn apply_filter(filter: &Filter, source: &Pixmap, px_scale: f32) -> Pixmap {
    let mut results: HashMap<&str, Pixmap> = HashMap::new();
    let empty = Pixmap::new(source.width, source.height);
    let mut last = source.clone();

    for primitive in &filter.primitives {
        let lookup = |input: FilterInput| resolve_input(input, source, &results, &empty);
        let output = match primitive {
            FilterPrimitive::GaussianBlur { input, std_dev, .. } => {
                lookup(*input).blur(std_dev * px_scale)
            }
            FilterPrimitive::ColorMatrix { input, values, .. } => {
                lookup(*input).color_matrix(values)
            }
            FilterPrimitive::Composite {
                input,
                input2,
                operator,
                ..
            } => lookup(*input).composite(lookup(*input2), *operator),
        };
        if let Some(name) = primitive.result() {
            results.insert(name, output.clone());
        }
        last = output;
    }
    last
}

fn resolve_input<'a>(
    input: FilterInput,
    source: &'a Pixmap,
    results: &'a HashMap<&str, Pixmap>,
    empty: &'a Pixmap,
) -> &'a Pixmap {
    match input {
        FilterInput::SourceGraphic => source,
        FilterInput::Result(name) => results.get(name).unwrap_or(empty),
    }
}
