//! Declarative vector scene.

use std::fmt;

use goo_core::Rgba;

/// A length in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Percentage of a reference extent.
    Percent(f32),
    /// Absolute pixels.
    Px(f32),
}

impl Length {
    /// Resolve against the extent percentages refer to.
    pub fn resolve(self, reference: f32) -> f32 {
        match self {
            Length::Percent(p) => p / 100.0 * reference,
            Length::Px(px) => px,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Percent(p) => write!(f, "{p}%"),
            Length::Px(px) => write!(f, "{px}"),
        }
    }
}

/// A filled circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: Length,
    pub cy: Length,
    pub r: Length,
    pub fill: Rgba,
}

/// Image a filter primitive reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterInput {
    /// The unfiltered content the filter is applied to.
    SourceGraphic,
    /// The named result of an earlier primitive.
    Result(&'static str),
}

impl fmt::Display for FilterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterInput::SourceGraphic => f.write_str("SourceGraphic"),
            FilterInput::Result(name) => f.write_str(name),
        }
    }
}

/// Porter-Duff operator of a composite primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOperator {
    Over,
    In,
    Atop,
}

impl CompositeOperator {
    /// Attribute value used by SVG.
    pub fn as_str(self) -> &'static str {
        match self {
            CompositeOperator::Over => "over",
            CompositeOperator::In => "in",
            CompositeOperator::Atop => "atop",
        }
    }
}

/// One step of a filter chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPrimitive {
    GaussianBlur {
        input: FilterInput,
        std_dev: f32,
        result: Option<&'static str>,
    },
    /// 4x5 row-major matrix over straight RGBA, offsets in `0..1` units.
    ColorMatrix {
        input: FilterInput,
        values: [f32; 20],
        result: Option<&'static str>,
    },
    Composite {
        input: FilterInput,
        input2: FilterInput,
        operator: CompositeOperator,
        result: Option<&'static str>,
    },
}

impl FilterPrimitive {
    /// Name under which later primitives can read this one's output.
    pub fn result(&self) -> Option<&'static str> {
        match self {
            FilterPrimitive::GaussianBlur { result, .. }
            | FilterPrimitive::ColorMatrix { result, .. }
            | FilterPrimitive::Composite { result, .. } => *result,
        }
    }
}

/// A named filter chain. The output of the last primitive is the result.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub id: &'static str,
    pub primitives: Vec<FilterPrimitive>,
}

/// Luminance mask built from white circles.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub id: &'static str,
    /// Filter applied to the mask content before it is used.
    pub filter: Option<&'static str>,
    pub circles: Vec<Circle>,
}

/// A complete frame: circles, optionally masked, under an optional filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Filter definitions referenced by id.
    pub filters: Vec<Filter>,
    /// Filter applied to the whole composited frame.
    pub filter: Option<&'static str>,
    /// Mask applied to the circle group before the frame filter.
    pub mask: Option<Mask>,
    /// Particle circles in paint order.
    pub circles: Vec<Circle>,
}

impl Scene {
    /// Look up a filter definition.
    pub fn find_filter(&self, id: &str) -> Option<&Filter> {
        self.filters.iter().find(|filter| filter.id == id)
    }
}
