//! Simulation side of the goo animation.
//!
//! A [`Simulation`] owns the particle store and the random source and is
//! driven by a [`FrameLoop`], which runs subscribed callbacks once per
//! frame. Spawning is a pure function of the random source and the wall
//! clock, see [`SpawnPolicy::plan`].

mod frame;
mod params;
mod simulation;
mod spawn;

pub use frame::{FrameLoop, FrameTick, Subscription};
pub use params::SimParams;
pub use simulation::{Motion, Pulse, Simulation};
pub use spawn::{
    ColorChoice, ColorWeights, SpawnPolicy, sweep_direction, varying_color, weighted_choice,
};
