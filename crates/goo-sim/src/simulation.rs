//! The particle store and its update step.

use std::time::{SystemTime, UNIX_EPOCH};

use goo_core::Particle;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::SimParams;

/// Per-millisecond motion constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Distance travelled per millisecond, in normalized units.
    pub speed: f64,
    /// Size lost per millisecond.
    pub decay: f64,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            speed: 0.00004,
            decay: 0.00004,
        }
    }
}

/// Slow sinusoidal modulation of the simulation rate.
///
/// The modulated elapsed time is `elapsed * (sin(now / period) + offset) * gain`.
/// With `offset > 1` the rate never stops or runs backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub period_ms: f64,
    pub offset: f64,
    pub gain: f64,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            period_ms: 3000.0,
            offset: 1.05,
            gain: 0.8,
        }
    }
}

impl Pulse {
    /// Scale an elapsed time by the breathing factor at `now_ms`.
    pub fn modulate(&self, elapsed_ms: f64, now_ms: f64) -> f64 {
        elapsed_ms * ((now_ms / self.period_ms).sin() + self.offset) * self.gain
    }
}

/// Explicit simulation object owning the particle store.
#[derive(Debug, Clone)]
pub struct Simulation {
    particles: Vec<Particle>,
    params: SimParams,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Create a simulation with a deterministic random source.
    pub fn new(params: SimParams, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a simulation seeded from the system clock.
    pub fn with_entropy(params: SimParams) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(params, seed)
    }

    /// Current parameters.
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Replace the parameters. Live particles keep their state.
    pub fn set_params(&mut self, params: SimParams) {
        self.params = params;
    }

    /// Append one spawn burst planned at `now_ms`. Returns the burst size.
    pub fn spawn(&mut self, now_ms: f64) -> usize {
        let burst = self.params.spawn.plan(&mut self.rng, now_ms);
        let count = burst.len();
        self.particles.extend(burst);
        trace!(count, total = self.particles.len(), "spawned burst");
        count
    }

    /// Append a single particle.
    pub fn insert(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Move and decay every particle by `elapsed_ms`, then drop the expired.
    pub fn tick(&mut self, elapsed_ms: f64) {
        let Motion { speed, decay } = self.params.motion;
        let step = elapsed_ms * speed;

        let before = self.particles.len();
        let next: Vec<Particle> = self
            .particles
            .iter()
            .map(|p| Particle {
                size: p.size - elapsed_ms * decay,
                x: p.x + p.direction.cos() * step,
                y: p.y + p.direction.sin() * step,
                ..*p
            })
            .filter(Particle::is_alive)
            .collect();
        self.particles = next;

        let culled = before - self.particles.len();
        if culled > 0 {
            trace!(culled, total = self.particles.len(), "culled particles");
        }
    }

    /// Tick with the elapsed time modulated by the breathing pulse.
    pub fn advance(&mut self, elapsed_ms: f64, now_ms: f64) {
        let elapsed = self.params.pulse.modulate(elapsed_ms, now_ms);
        self.tick(elapsed);
    }

    /// Current particles in spawn order.
    pub fn snapshot(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goo_core::{Rgba, Variant};

    fn sim() -> Simulation {
        Simulation::new(SimParams::for_variant(Variant::Ink), 42)
    }

    #[test]
    fn test_tick_moves_along_direction() {
        let mut sim = sim();
        sim.insert(Particle::new(0.3, 0.4, 0.0, Rgba::BLACK));
        sim.tick(16.0);

        let p = sim.snapshot()[0];
        assert!((p.x - 0.30064).abs() < 1e-12);
        assert!((p.y - 0.4).abs() < 1e-12);
        assert!((p.size - 0.09936).abs() < 1e-12);
        assert!(p.is_alive());
    }

    #[test]
    fn test_tick_decays_exactly() {
        let mut sim = sim();
        for i in 0..10 {
            sim.insert(Particle::new(0.5, 0.5, i as f64, Rgba::WHITE));
        }
        let before: Vec<f64> = sim.snapshot().iter().map(|p| p.size).collect();
        sim.tick(33.0);
        let decay = sim.params().motion.decay;
        for (p, size) in sim.snapshot().iter().zip(before) {
            assert_eq!(p.size, size - 33.0 * decay);
        }
    }

    #[test]
    fn test_tick_drops_expired() {
        let mut sim = sim();
        let mut dying = Particle::new(0.1, 0.1, 0.0, Rgba::BLACK);
        dying.size = 0.0001;
        let mut huge = Particle::new(0.2, 0.2, 0.0, Rgba::BLACK);
        huge.size = 150.0;
        sim.insert(dying);
        sim.insert(huge);
        sim.insert(Particle::new(0.3, 0.3, 0.0, Rgba::BLACK));

        sim.tick(16.0);
        assert_eq!(sim.len(), 1);
        assert!(sim.snapshot().iter().all(Particle::is_alive));
    }

    #[test]
    fn test_spawn_appends_and_tick_never_grows() {
        let mut sim = sim();
        let mut now = 0.0;
        for _ in 0..100 {
            let before = sim.len();
            let added = sim.spawn(now);
            assert_eq!(sim.len(), before + added);
            assert!(matches!(added, 1 | 2 | 4));

            let before = sim.len();
            sim.advance(16.0, now);
            assert!(sim.len() <= before);
            now += 16.0;
        }
    }

    #[test]
    fn test_pulse_modulation() {
        let pulse = Pulse::default();
        assert!((pulse.modulate(16.0, 0.0) - 16.0 * 1.05 * 0.8).abs() < 1e-12);
        for i in 0..1000 {
            assert!(pulse.modulate(16.0, i as f64 * 37.0) > 0.0);
        }
    }

    #[test]
    fn test_advance_uses_pulsed_elapsed() {
        let mut sim = sim();
        sim.insert(Particle::new(0.3, 0.4, 0.0, Rgba::BLACK));
        let Motion { speed, decay } = sim.params().motion;
        let elapsed = sim.params().pulse.modulate(16.0, 1000.0);
        assert!((elapsed - 16.0).abs() > 1e-3);

        sim.advance(16.0, 1000.0);
        let p = sim.snapshot()[0];
        assert!((p.size - (0.1 - elapsed * decay)).abs() < 1e-15);
        assert!((p.x - (0.3 + elapsed * speed)).abs() < 1e-15);
        assert!((p.y - 0.4).abs() < 1e-15);
    }

    #[test]
    fn test_advance_depends_on_now() {
        let mut early = sim();
        let mut late = sim();
        early.insert(Particle::new(0.5, 0.5, 0.0, Rgba::WHITE));
        late.insert(Particle::new(0.5, 0.5, 0.0, Rgba::WHITE));

        // Near the peak and the trough of the default 3000 ms pulse.
        early.advance(16.0, 4712.0);
        late.advance(16.0, 14137.0);

        let fast = early.snapshot()[0];
        let slow = late.snapshot()[0];
        assert!(fast.size < slow.size);
        assert!(fast.x > slow.x);
    }

    #[test]
    fn test_same_seed_same_bursts() {
        let mut a = sim();
        let mut b = sim();
        for i in 0..20 {
            a.spawn(i as f64 * 16.0);
            b.spawn(i as f64 * 16.0);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_clear() {
        let mut sim = sim();
        sim.spawn(0.0);
        assert!(!sim.is_empty());
        sim.clear();
        assert!(sim.is_empty());
    }
}
