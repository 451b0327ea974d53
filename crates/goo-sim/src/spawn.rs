//! Spawn policy: where, which way and in what color new blobs appear.

use std::f64::consts::{PI, TAU};

use goo_core::{Particle, Rgba};
use rand::Rng;

/// Periods in milliseconds of the red, green and blue sine waves.
const CHANNEL_PERIODS_MS: [f64; 3] = [1000.0, 10_000.0, 1100.0];

/// Direction of newly spawned particles at wall-clock time `now_ms`.
///
/// Sweeps through a full turn roughly every 63 ms, which reads as a fast
/// rotation rather than a random heading.
pub fn sweep_direction(now_ms: f64) -> f64 {
    (now_ms / 10.0).sin() * TAU
}

/// Opaque color whose channels follow three independent sine waves.
pub fn varying_color(now_ms: f64) -> Rgba {
    let [r, g, b] = CHANNEL_PERIODS_MS.map(|period| ((now_ms / period).sin() * 0.5 + 0.5) as f32);
    Rgba::opaque(r, g, b)
}

/// Pick one item with probability proportional to its weight.
///
/// Negative weights count as zero. When every weight is zero the last item
/// is returned; an empty slice returns `None`.
pub fn weighted_choice<T, R>(rng: &mut R, items: &[(T, f64)]) -> Option<T>
where
    T: Copy,
    R: Rng + ?Sized,
{
    let (last, _) = items.last()?;
    let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return Some(*last);
    }

    let mut roll = rng.gen_range(0.0..total);
    for (item, weight) in items {
        let weight = weight.max(0.0);
        if roll < weight {
            return Some(*item);
        }
        roll -= weight;
    }
    // Rounding can leave a sliver past the final bucket.
    items
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(item, _)| *item)
}

/// Color source for a spawn burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// [`varying_color`] at spawn time.
    Varying,
    /// Flat white.
    White,
    /// Flat black.
    Black,
}

impl ColorChoice {
    /// Resolve to a concrete color at wall-clock time `now_ms`.
    pub fn resolve(self, now_ms: f64) -> Rgba {
        match self {
            ColorChoice::Varying => varying_color(now_ms),
            ColorChoice::White => Rgba::WHITE,
            ColorChoice::Black => Rgba::BLACK,
        }
    }
}

/// Relative weights of the three color sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorWeights {
    pub varying: f64,
    pub white: f64,
    pub black: f64,
}

impl ColorWeights {
    /// Draw a color source.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> ColorChoice {
        weighted_choice(
            rng,
            &[
                (ColorChoice::Varying, self.varying),
                (ColorChoice::White, self.white),
                (ColorChoice::Black, self.black),
            ],
        )
        .unwrap_or(ColorChoice::Varying)
    }
}

/// How a burst of particles is laid out on each spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPolicy {
    /// Color source weights.
    pub colors: ColorWeights,
    /// Chance of adding the horizontal mirror at `(1 - x, y)`.
    pub mirror_probability: f64,
    /// Chance, once mirrored, of completing the four-fold set.
    pub quad_probability: f64,
}

impl SpawnPolicy {
    /// Plan one burst of 1, 2 or 4 particles.
    ///
    /// All particles of a burst share one color. The first sits at a
    /// uniformly random `(x, y)`; the others are its reflections.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R, now_ms: f64) -> Vec<Particle> {
        let x = rng.gen_range(0.0..1.0);
        let y = rng.gen_range(0.0..1.0);
        let direction = sweep_direction(now_ms);
        let color = self.colors.choose(rng).resolve(now_ms);

        let mut burst = Vec::with_capacity(4);
        burst.push(Particle::new(x, y, direction, color));

        if rng.gen_bool(self.mirror_probability.clamp(0.0, 1.0)) {
            burst.push(Particle::new(1.0 - x, y, -direction - PI, color));
            if rng.gen_bool(self.quad_probability.clamp(0.0, 1.0)) {
                burst.push(Particle::new(x, 1.0 - y, -direction, color));
                burst.push(Particle::new(1.0 - x, 1.0 - y, direction - PI, color));
            }
        }
        burst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn policy(mirror: f64, quad: f64) -> SpawnPolicy {
        SpawnPolicy {
            colors: ColorWeights {
                varying: 1.0,
                white: 0.0,
                black: 0.0,
            },
            mirror_probability: mirror,
            quad_probability: quad,
        }
    }

    fn same_angle(a: f64, b: f64) -> bool {
        let diff = (a - b).rem_euclid(TAU);
        diff < 1e-9 || TAU - diff < 1e-9
    }

    #[test]
    fn test_quad_burst_is_mirrored() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let burst = policy(1.0, 1.0).plan(&mut rng, 1234.0);
        assert_eq!(burst.len(), 4);

        let [a, b, c, d] = [burst[0], burst[1], burst[2], burst[3]];
        assert_eq!(b.x, 1.0 - a.x);
        assert_eq!(b.y, a.y);
        assert_eq!(c.x, a.x);
        assert_eq!(c.y, 1.0 - a.y);
        assert_eq!(d.x, 1.0 - a.x);
        assert_eq!(d.y, 1.0 - a.y);

        assert!(same_angle(b.direction, -a.direction - PI));
        assert!(same_angle(c.direction, -a.direction));
        assert!(same_angle(d.direction, a.direction - PI));
        assert!(burst.iter().all(|p| p.color == a.color));
    }

    #[test]
    fn test_burst_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(policy(0.0, 1.0).plan(&mut rng, 0.0).len(), 1);
        assert_eq!(policy(1.0, 0.0).plan(&mut rng, 0.0).len(), 2);

        let mut seen = [false; 5];
        for _ in 0..200 {
            let n = policy(1.0, 0.5).plan(&mut rng, 0.0).len();
            assert!(n == 2 || n == 4);
            seen[n] = true;
        }
        assert!(seen[2] && seen[4]);
    }

    #[test]
    fn test_spawn_positions_in_unit_square() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for i in 0..500 {
            for p in policy(1.0, 0.5).plan(&mut rng, i as f64) {
                assert!((0.0..=1.0).contains(&p.x));
                assert!((0.0..=1.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_direction_follows_clock() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let burst = policy(0.0, 0.0).plan(&mut rng, 5000.0);
        assert_eq!(burst[0].direction, sweep_direction(5000.0));
        assert_eq!(sweep_direction(0.0), 0.0);
        assert!((sweep_direction(5.0 * PI) - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_varying_color_channels() {
        let c = varying_color(0.0);
        assert_eq!(c, Rgba::opaque(0.5, 0.5, 0.5));

        let c = varying_color(1000.0 * PI / 2.0);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_weighted_choice_skips_zero_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..1000 {
            let pick = weighted_choice(&mut rng, &[("a", 0.0), ("b", 1.0), ("c", 0.0)]);
            assert_eq!(pick, Some("b"));
        }
    }

    #[test]
    fn test_weighted_choice_degenerate_inputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert_eq!(weighted_choice::<u8, _>(&mut rng, &[]), None);
        assert_eq!(weighted_choice(&mut rng, &[(1, 0.0), (2, 0.0)]), Some(2));
        assert_eq!(weighted_choice(&mut rng, &[(1, -3.0), (2, 0.5)]), Some(2));
    }

    #[test]
    fn test_weighted_choice_frequencies() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let weights = ColorWeights {
            varying: 0.2,
            white: 0.04,
            black: 0.76,
        };
        let trials = 20_000;
        let black = (0..trials)
            .filter(|_| weights.choose(&mut rng) == ColorChoice::Black)
            .count();
        let share = black as f64 / trials as f64;
        assert!((share - 0.76).abs() < 0.02, "black share {share}");
    }
}
