use crate::fader::{self, Fader};
use crate::gain_curve::GainPair;

#[derive(Clone, Copy)]
pub struct StereoIn<'a> {
    pub left: &'a [f32],
    pub right: &'a [f32],
}

pub struct StereoOut<'a> {
    pub left: &'a mut [f32],
    pub right: &'a mut [f32],
}

impl<'a> StereoIn<'a> {
    pub fn new(left: &'a [f32], right: &'a [f32]) -> StereoIn<'a> {
        StereoIn { left, right }
    }
}

impl<'a> StereoOut<'a> {
    pub fn new(left: &'a mut [f32], right: &'a mut [f32]) -> StereoOut<'a> {
        StereoOut { left, right }
    }

    pub fn len(&self) -> usize {
        usize::min(self.left.len(), self.right.len())
    }
}

// Mixes two stereo inputs into one output. Gain changes between blocks are
// ramped over the first samples of the block that introduces them.
pub struct CrossFader {
    // gains in effect at the end of the previous block; always a target, never
    // an intermediate ramp value
    committed: GainPair,
}

fn mix_constant(out: &mut [f32], a: &[f32], b: &[f32], gains: GainPair) {
    for ((out, a), b) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
        *out = a * gains.a + b * gains.b;
    }
}

fn mix_ramped(out: &mut [f32], a: &[f32], b: &[f32], fader_a: &Fader, fader_b: &Fader) {
    for (pos, ((out, a), b)) in out.iter_mut().zip(a.iter()).zip(b.iter()).enumerate() {
        *out = a * fader_a.gain(pos) + b * fader_b.gain(pos);
    }
}

impl CrossFader {
    pub fn new() -> CrossFader {
        CrossFader {
            committed: GainPair::UNITY,
        }
    }

    pub fn committed(&self) -> GainPair {
        self.committed
    }

    /// Writes `out = in_a * gain_a + in_b * gain_b`, ramping each gain from the
    /// committed value to `target`, then commits `target`. Slices are expected
    /// to have equal lengths; only the common prefix is processed otherwise.
    pub fn process(&mut self, target: GainPair, in_a: StereoIn, in_b: StereoIn, out: StereoOut) {
        debug_assert!(
            in_a.left.len() == out.left.len()
                && in_a.right.len() == out.right.len()
                && in_b.left.len() == out.left.len()
                && in_b.right.len() == out.right.len(),
            "mismatched block lengths"
        );

        if self.committed.same_bits(&target) {
            mix_constant(out.left, in_a.left, in_b.left, target);
            mix_constant(out.right, in_a.right, in_b.right, target);
        } else {
            let window = fader::window(out.len());
            let fader_a = Fader::new(self.committed.a, target.a, window);
            let fader_b = Fader::new(self.committed.b, target.b, window);
            mix_ramped(out.left, in_a.left, in_b.left, &fader_a, &fader_b);
            mix_ramped(out.right, in_a.right, in_b.right, &fader_a, &fader_b);
        }

        self.committed = target;
    }
}
