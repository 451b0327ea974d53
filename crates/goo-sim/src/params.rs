//! Per-variant simulation presets.

use goo_core::Variant;

use crate::{ColorWeights, Motion, Pulse, SpawnPolicy};

/// Everything the simulation needs besides its random source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    pub spawn: SpawnPolicy,
    pub motion: Motion,
    pub pulse: Pulse,
}

impl SimParams {
    /// Preset for a variant.
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            // Black ink: 20% varying, then 5% of the remainder white.
            Variant::Ink => Self {
                spawn: SpawnPolicy {
                    colors: ColorWeights {
                        varying: 0.2,
                        white: 0.04,
                        black: 0.76,
                    },
                    mirror_probability: 1.0,
                    quad_probability: 0.5,
                },
                motion: Motion::default(),
                pulse: Pulse::default(),
            },
            Variant::Prism => Self {
                spawn: SpawnPolicy {
                    colors: ColorWeights {
                        varying: 0.9,
                        white: 0.05,
                        black: 0.05,
                    },
                    mirror_probability: 1.0,
                    quad_probability: 0.5,
                },
                motion: Motion::default(),
                pulse: Pulse {
                    period_ms: 4000.0,
                    offset: 1.1,
                    gain: 0.7,
                },
            },
            Variant::Drift => Self {
                spawn: SpawnPolicy {
                    colors: ColorWeights {
                        varying: 0.85,
                        white: 0.1,
                        black: 0.05,
                    },
                    mirror_probability: 1.0,
                    quad_probability: 0.25,
                },
                motion: Motion::default(),
                pulse: Pulse {
                    period_ms: 5000.0,
                    offset: 1.2,
                    gain: 0.6,
                },
            },
        }
    }

    /// Override the motion constants where given.
    pub fn with_motion(mut self, speed: Option<f64>, decay: Option<f64>) -> Self {
        if let Some(speed) = speed {
            self.motion.speed = speed;
        }
        if let Some(decay) = decay {
            self.motion.decay = decay;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_always_mirror() {
        for variant in Variant::ALL {
            let params = SimParams::for_variant(variant);
            assert_eq!(params.spawn.mirror_probability, 1.0);
            assert!(params.pulse.offset > 1.0, "{variant} pulse can stall");
        }
    }

    #[test]
    fn test_with_motion_overrides_only_given() {
        let params = SimParams::for_variant(Variant::Prism).with_motion(Some(0.001), None);
        assert_eq!(params.motion.speed, 0.001);
        assert_eq!(params.motion.decay, Motion::default().decay);
    }
}
