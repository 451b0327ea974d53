//! Core types shared by the goo crates.

mod color;
mod particle;
mod variant;

pub use color::Rgba;
pub use particle::{INITIAL_SIZE, Particle, SIZE_UPPER_BOUND};
pub use variant::Variant;
