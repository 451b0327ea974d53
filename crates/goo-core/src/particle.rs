//! The particle record.

use crate::Rgba;

/// Size every particle starts with.
pub const INITIAL_SIZE: f64 = 0.1;

/// Exclusive upper bound of a live particle's size.
pub const SIZE_UPPER_BOUND: f64 = 100.0;

/// A single animated blob.
///
/// Coordinates live in a normalized `[0, 1] x [0, 1]` space but are not
/// clamped, so a particle may drift off screen before it decays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, growing downwards.
    pub y: f64,
    /// Direction of travel in radians, fixed at creation.
    pub direction: f64,
    /// Decaying size, see [`Particle::is_alive`].
    pub size: f64,
    /// Fill color, fixed at creation.
    pub color: Rgba,
}

impl Particle {
    /// Create a particle with the initial size.
    pub fn new(x: f64, y: f64, direction: f64, color: Rgba) -> Self {
        Self {
            x,
            y,
            direction,
            size: INITIAL_SIZE,
            color,
        }
    }

    /// Whether the size is still inside the open interval `(0, 100)`.
    pub fn is_alive(&self) -> bool {
        self.size > 0.0 && self.size < SIZE_UPPER_BOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_particle_starts_at_initial_size() {
        let p = Particle::new(0.3, 0.4, 0.0, Rgba::BLACK);
        assert_eq!(p.size, INITIAL_SIZE);
        assert!(p.is_alive());
    }

    #[test]
    fn test_is_alive_bounds_are_exclusive() {
        let mut p = Particle::new(0.5, 0.5, 0.0, Rgba::WHITE);
        p.size = 0.0;
        assert!(!p.is_alive());
        p.size = SIZE_UPPER_BOUND;
        assert!(!p.is_alive());
        p.size = -1.0;
        assert!(!p.is_alive());
        p.size = 1e-9;
        assert!(p.is_alive());
    }
}
