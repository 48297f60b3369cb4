//! The crossfade engine as seen by a host: create it once, call
//! [`Xfade::process`] per block with the current control values, drop it when done.

use crate::cross_fader::{CrossFader, StereoIn, StereoOut};
use crate::gain_curve::{self, GainPair, OverlapMode};
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid sample rate {0}")]
    InvalidSampleRate(f64),
}

/// Which controls the engine honors.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Equal-power crossfade only; shape and mode are ignored.
    Basic,
    /// Shape morph between linear and power laws, plus the V-fade mode.
    Extended,
}

/// Control values as the host holds them, read at the start of each block.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Controls {
    pub position: f32,
    pub shape: f32,
    pub mode: f32,
}

impl Default for Controls {
    fn default() -> Controls {
        Controls {
            position: 0.0,
            shape: 1.0,
            mode: OverlapMode::Crossfade.selector(),
        }
    }
}

pub struct Xfade {
    sample_rate: f64,
    variant: Variant,
    cross_fader: CrossFader,
}

impl Xfade {
    pub fn create(sample_rate: f64, variant: Variant) -> Result<Xfade, Error> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        Ok(Xfade {
            sample_rate,
            variant,
            cross_fader: CrossFader::new(),
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Gains in effect at the end of the last processed block.
    pub fn committed(&self) -> GainPair {
        self.cross_fader.committed()
    }

    /// Gains the next block would ramp to for `controls`.
    pub fn target(&self, controls: &Controls) -> GainPair {
        target(self.variant, controls)
    }

    pub fn process(&mut self, controls: &Controls, in_a: StereoIn, in_b: StereoIn, out: StereoOut) {
        let target = self.target(controls);
        self.cross_fader.process(target, in_a, in_b, out);
    }
}

pub fn target(variant: Variant, controls: &Controls) -> GainPair {
    match variant {
        Variant::Basic => gain_curve::equal_power(controls.position),
        Variant::Extended => gain_curve::target(
            controls.position,
            controls.shape,
            OverlapMode::from_selector(controls.mode),
        ),
    }
}
