//! Animation variants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Preset tunings of the animation.
///
/// The presets differ in color weights, burst symmetry, breathing rate and
/// whether the soft vignette mask is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Mostly black ink with occasional colored and white drops, masked.
    Ink,
    /// Mostly time-varying color, masked.
    #[default]
    Prism,
    /// Mostly time-varying color, sparser quad bursts, no mask.
    Drift,
}

impl Variant {
    /// All variants in cycling order.
    pub const ALL: [Variant; 3] = [Variant::Ink, Variant::Prism, Variant::Drift];

    /// Cycle to the next variant.
    pub fn next(self) -> Self {
        match self {
            Variant::Ink => Variant::Prism,
            Variant::Prism => Variant::Drift,
            Variant::Drift => Variant::Ink,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Ink => "ink",
            Variant::Prism => "prism",
            Variant::Drift => "drift",
        }
    }

    /// Whether this variant draws the soft circular mask by default.
    pub fn masked(self) -> bool {
        !matches!(self, Variant::Drift)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cycles_through_all() {
        let mut v = Variant::Ink;
        for expected in Variant::ALL.iter().cycle().skip(1).take(3) {
            v = v.next();
            assert_eq!(v, *expected);
        }
        assert_eq!(v, Variant::Ink);
    }

    #[test]
    fn test_two_of_three_are_masked() {
        let masked = Variant::ALL.iter().filter(|v| v.masked()).count();
        assert_eq!(masked, 2);
    }
}
