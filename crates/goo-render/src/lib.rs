//! Rendering side of the goo animation.
//!
//! Particles are projected into a declarative [`Scene`] of circles, filters
//! and an optional mask. A scene can then be rasterized for the terminal
//! ([`raster`], [`view`]) or written out as an SVG document ([`svg`]).

mod project;
pub mod raster;
mod scene;
pub mod svg;
pub mod view;

pub use project::{PING_PONG_PEAK, RenderOptions, ping_pong, project};
pub use scene::{
    Circle, CompositeOperator, Filter, FilterInput, FilterPrimitive, Length, Mask, Scene,
};
