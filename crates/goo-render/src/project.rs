//! Projection of the particle store onto a scene.

use goo_core::{Particle, Rgba, Variant};

use crate::scene::{
    Circle, CompositeOperator, Filter, FilterInput, FilterPrimitive, Length, Mask, Scene,
};

/// Size at which the rendered radius peaks.
pub const PING_PONG_PEAK: f64 = 0.05;

/// Number of circles making up the soft mask.
const MASK_CIRCLES: usize = 4;

const GOO_FILTER: &str = "goo";
const BLUR_FILTER: &str = "blur";
const MASK_ID: &str = "mask";

/// Triangular size-to-radius mapping.
///
/// Rises with `size` up to [`PING_PONG_PEAK`] and falls beyond it, so a
/// particle decaying from the initial size first grows on screen, then
/// shrinks away.
pub fn ping_pong(size: f64) -> f64 {
    if size < PING_PONG_PEAK {
        size
    } else {
        PING_PONG_PEAK - (size - PING_PONG_PEAK)
    }
}

/// Tunables of the projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Draw the soft circular mask.
    pub mask: bool,
    /// Blur of the goo filter, in reference pixels.
    pub goo_blur: f32,
    /// Alpha gain of the goo threshold.
    pub goo_alpha_slope: f32,
    /// Alpha offset of the goo threshold.
    pub goo_alpha_offset: f32,
    /// Blur applied to the mask circles, in reference pixels.
    pub mask_blur: f32,
    /// Percent of viewport per unit of ping-pong size.
    pub radius_scale: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mask: true,
            goo_blur: 25.0,
            goo_alpha_slope: 18.0,
            goo_alpha_offset: -8.0,
            mask_blur: 2.0,
            radius_scale: 80.0,
        }
    }
}

impl RenderOptions {
    /// Options for a variant.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            mask: variant.masked(),
            ..Self::default()
        }
    }

    fn goo_filter(&self) -> Filter {
        #[rustfmt::skip]
        let values = [
            1.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 0.0, self.goo_alpha_slope, self.goo_alpha_offset,
        ];
        Filter {
            id: GOO_FILTER,
            primitives: vec![
                FilterPrimitive::GaussianBlur {
                    input: FilterInput::SourceGraphic,
                    std_dev: self.goo_blur,
                    result: Some("blur"),
                },
                FilterPrimitive::ColorMatrix {
                    input: FilterInput::Result("blur"),
                    values,
                    result: Some("goo"),
                },
                FilterPrimitive::Composite {
                    input: FilterInput::SourceGraphic,
                    input2: FilterInput::Result("goo"),
                    operator: CompositeOperator::Atop,
                    result: None,
                },
            ],
        }
    }

    fn blur_filter(&self) -> Filter {
        Filter {
            id: BLUR_FILTER,
            primitives: vec![FilterPrimitive::GaussianBlur {
                input: FilterInput::SourceGraphic,
                std_dev: self.mask_blur,
                result: None,
            }],
        }
    }
}

/// Build the mask whose circles bob vertically with time.
fn soft_mask(now_ms: f64) -> Mask {
    let circles = (0..MASK_CIRCLES)
        .map(|i| {
            let cy = (now_ms * i as f64 / 5000.0).sin() * 50.0 + 50.0;
            Circle {
                cx: Length::Percent(50.0),
                cy: Length::Percent(cy as f32),
                r: Length::Percent((i + 1) as f32 * (50.0 / MASK_CIRCLES as f32)),
                fill: Rgba::WHITE,
            }
        })
        .collect();
    Mask {
        id: MASK_ID,
        filter: Some(BLUR_FILTER),
        circles,
    }
}

/// Project particles into a scene. Pure; the store is only read.
pub fn project(particles: &[Particle], now_ms: f64, options: &RenderOptions) -> Scene {
    let circles = particles
        .iter()
        .map(|p| Circle {
            cx: Length::Percent((p.x * 100.0) as f32),
            cy: Length::Percent((p.y * 100.0) as f32),
            r: Length::Percent((ping_pong(p.size).max(0.0) * options.radius_scale) as f32),
            fill: p.color,
        })
        .collect();

    Scene {
        filters: vec![options.goo_filter(), options.blur_filter()],
        filter: Some(GOO_FILTER),
        mask: options.mask.then(|| soft_mask(now_ms)),
        circles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_pong_is_triangular() {
        assert_eq!(ping_pong(0.0), 0.0);
        assert_eq!(ping_pong(0.02), 0.02);
        assert!((ping_pong(0.1) - 0.0).abs() < 1e-12);
        assert!((ping_pong(0.08) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_ping_pong_continuous_at_peak() {
        let below = ping_pong(PING_PONG_PEAK - 1e-9);
        let above = ping_pong(PING_PONG_PEAK + 1e-9);
        assert!((below - above).abs() < 1e-8);
        assert_eq!(ping_pong(PING_PONG_PEAK), PING_PONG_PEAK);
    }

    #[test]
    fn test_projects_one_circle_per_particle() {
        let mut p = Particle::new(0.3, 0.4, 0.0, Rgba::BLACK);
        p.size = 0.03;
        let scene = project(&[p, p], 0.0, &RenderOptions::default());

        assert_eq!(scene.circles.len(), 2);
        let c = scene.circles[0];
        assert_eq!(c.cx, Length::Percent(30.0));
        assert_eq!(c.cy, Length::Percent(40.0));
        match c.r {
            Length::Percent(r) => assert!((r - 2.4).abs() < 1e-5),
            Length::Px(_) => panic!("radius should be a percentage"),
        }
        assert_eq!(c.fill, Rgba::BLACK);
    }

    #[test]
    fn test_radius_never_negative() {
        let mut p = Particle::new(0.5, 0.5, 0.0, Rgba::WHITE);
        p.size = 0.5;
        let scene = project(&[p], 0.0, &RenderOptions::default());
        assert_eq!(scene.circles[0].r, Length::Percent(0.0));
    }

    #[test]
    fn test_goo_filter_chain() {
        let scene = project(&[], 0.0, &RenderOptions::default());
        assert_eq!(scene.filter, Some("goo"));
        let goo = scene.find_filter("goo").map(|f| f.primitives.len());
        assert_eq!(goo, Some(3));
        assert!(scene.find_filter("blur").is_some());
    }

    #[test]
    fn test_mask_follows_variant() {
        for variant in Variant::ALL {
            let scene = project(&[], 0.0, &RenderOptions::for_variant(variant));
            assert_eq!(scene.mask.is_some(), variant.masked());
        }
    }

    #[test]
    fn test_mask_circles_bob_with_time() {
        let mask = soft_mask(0.0);
        assert_eq!(mask.circles.len(), 4);
        assert!(mask.circles.iter().all(|c| c.cy == Length::Percent(50.0)));
        assert_eq!(mask.circles[3].r, Length::Percent(50.0));

        let later = soft_mask(1234.0);
        assert_eq!(later.circles[0].cy, Length::Percent(50.0));
        for (i, circle) in later.circles.iter().enumerate().skip(1) {
            let expected = ((1234.0 * i as f64 / 5000.0).sin() * 50.0 + 50.0) as f32;
            assert_eq!(circle.cy, Length::Percent(expected));
        }
        // sin(0.2468) * 50 + 50
        match later.circles[1].cy {
            Length::Percent(cy) => assert!((cy - 62.2151).abs() < 1e-3),
            Length::Px(_) => panic!("cy should be a percentage"),
        }
    }
}
