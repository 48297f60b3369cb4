// Target gain computation for the two inputs. Everything here is a pure
// function of the current control values.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainPair {
    pub a: f32,
    pub b: f32,
}

impl GainPair {
    pub const UNITY: GainPair = GainPair { a: 1.0, b: 1.0 };

    pub fn new(a: f32, b: f32) -> GainPair {
        GainPair { a, b }
    }

    // bit-identical comparison; -0.0 and 0.0 count as different
    pub fn same_bits(&self, other: &GainPair) -> bool {
        self.a.to_bits() == other.a.to_bits() && self.b.to_bits() == other.b.to_bits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapMode {
    Crossfade, // gains sum to 1
    VFade,     // only the fading-out input is attenuated
}

impl OverlapMode {
    /// Interprets a host-side float selector. Anything below 1 (including NaN)
    /// is `Crossfade`.
    pub fn from_selector(selector: f32) -> OverlapMode {
        if bounded(selector, 0.0, 1.0) >= 1.0 {
            OverlapMode::VFade
        } else {
            OverlapMode::Crossfade
        }
    }

    pub fn selector(self) -> f32 {
        match self {
            OverlapMode::Crossfade => 0.0,
            OverlapMode::VFade => 1.0,
        }
    }
}

/// Clamps `value` into `[min, max]`. Unlike `f32::clamp` a NaN comes out as `min`.
pub fn bounded(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

fn root(value: f32) -> f32 {
    value.max(0.0).sqrt()
}

pub fn equal_power(position: f32) -> GainPair {
    // infinities land on the boundaries; finite positions are left alone
    let position = if position.is_infinite() {
        position.signum()
    } else {
        position
    };
    if position == -1.0 {
        GainPair::new(1.0, 0.0)
    } else if position == 1.0 {
        GainPair::new(0.0, 1.0)
    } else {
        GainPair::new(root(0.5 - position / 2.0), root(0.5 + position / 2.0))
    }
}

pub fn linear(position: f32) -> GainPair {
    let b = 0.5 + bounded(position, -1.0, 1.0) / 2.0;
    GainPair::new(1.0 - b, b)
}

pub fn vfade_linear(position: f32) -> GainPair {
    let x = bounded(position, -1.0, 1.0);
    if x < 0.0 {
        GainPair::new(1.0 + x, 1.0)
    } else if x > 0.0 {
        GainPair::new(1.0, 1.0 - x)
    } else {
        GainPair::UNITY
    }
}

pub fn vfade_power(position: f32) -> GainPair {
    let x = bounded(position, -1.0, 1.0);
    if x < 0.0 {
        GainPair::new(root(1.0 + x), 1.0)
    } else if x > 0.0 {
        GainPair::new(1.0, root(1.0 - x))
    } else {
        GainPair::UNITY
    }
}

/// Target gains for `position`, blending the linear and power laws of `mode`
/// by `shape` (0 = linear, 1 = power).
pub fn target(position: f32, shape: f32, mode: OverlapMode) -> GainPair {
    let shape = bounded(shape, 0.0, 1.0);
    let (power, plain) = match mode {
        OverlapMode::Crossfade => (equal_power(position), linear(position)),
        OverlapMode::VFade => (vfade_power(position), vfade_linear(position)),
    };
    if shape == 1.0 {
        return power;
    }
    if shape == 0.0 {
        return plain;
    }
    // written as an offset from the plain law so that points where both laws
    // agree (the boundaries, the V-fade center) stay exact
    GainPair::new(
        plain.a + shape * (power.a - plain.a),
        plain.b + shape * (power.b - plain.b),
    )
}
