//! Terminal presentation of a rasterized scene.
//!
//! Each terminal cell shows two vertically stacked pixels with the upper
//! half block: the top pixel as foreground, the bottom one as background.

use goo_core::Rgba;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::raster::{Pixmap, RasterOptions, rasterize};
use crate::scene::Scene;

const HALF_BLOCK: &str = "▀";

/// Flatten a pixel over an opaque background.
fn flatten(pixmap: &Pixmap, x: usize, y: usize, background: Rgba) -> Rgba {
    let color = pixmap.color(x, y);
    background.lerp(Rgba { a: 1.0, ..color }, color.a)
}

/// Turn a pixmap into half-block lines, two pixel rows per line.
pub fn scene_lines(pixmap: &Pixmap, background: Rgba) -> Vec<Line<'static>> {
    (0..pixmap.height().div_ceil(2))
        .map(|row| {
            let spans: Vec<Span> = (0..pixmap.width())
                .map(|x| {
                    let top = flatten(pixmap, x, row * 2, background);
                    let bottom = flatten(pixmap, x, row * 2 + 1, background);
                    Span::styled(
                        HALF_BLOCK,
                        Style::new().fg(top.to_color()).bg(bottom.to_color()),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Rasterize `scene` at the resolution of `area` and draw it there.
pub fn render_scene(frame: &mut Frame, area: Rect, scene: &Scene, background: Rgba) {
    if area.is_empty() {
        return;
    }
    let pixmap = rasterize(
        scene,
        RasterOptions {
            width: area.width as usize,
            height: area.height as usize * 2,
        },
    );
    frame.render_widget(Paragraph::new(scene_lines(&pixmap, background)), area);
}
