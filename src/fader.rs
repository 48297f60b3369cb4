pub const FADE_LEN: usize = 64;

// Linear gain ramp from `from` to `to`, reaching `to` at sample `window` and
// holding it after that.
#[derive(Debug, Clone, Copy)]
pub struct Fader {
    from: f32,
    to: f32,
    window: usize,
}

/// Ramp window for a block of `block_len` samples: `FADE_LEN` for long blocks,
/// otherwise short enough that the ramp ends on the last sample.
pub fn window(block_len: usize) -> usize {
    usize::max(1, usize::min(FADE_LEN, block_len.saturating_sub(1)))
}

impl Fader {
    pub fn new(from: f32, to: f32, window: usize) -> Fader {
        Fader {
            from,
            to,
            window: usize::max(1, window),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.from.to_bits() == self.to.to_bits()
    }

    pub fn gain(&self, pos: usize) -> f32 {
        if pos >= self.window {
            self.to
        } else {
            self.from + (self.to - self.from) * pos as f32 / self.window as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_follows_block_length() {
        assert_eq!(window(4096), 64);
        assert_eq!(window(128), 64);
        assert_eq!(window(65), 64);
        assert_eq!(window(64), 63);
        assert_eq!(window(16), 15);
        assert_eq!(window(2), 1);
        assert_eq!(window(1), 1);
        assert_eq!(window(0), 1);
    }

    #[test]
    fn starts_at_from_and_lands_on_to() {
        let fader = Fader::new(1.0, 0.123_456_7, 64);
        assert_eq!(fader.gain(0), 1.0);
        assert_eq!(fader.gain(64), 0.123_456_7);
        assert_eq!(fader.gain(1000), 0.123_456_7);
    }

    #[test]
    fn ramps_linearly() {
        let fader = Fader::new(0.0, 1.0, 64);
        assert_eq!(fader.gain(16), 0.25);
        assert_eq!(fader.gain(32), 0.5);
        for pos in 1..64 {
            assert!(fader.gain(pos) > fader.gain(pos - 1));
        }
    }

    #[test]
    fn scales_difference_before_dividing() {
        let (from, to) = (1.0f32, 0.3f32);
        let fader = Fader::new(from, to, 63);
        for pos in 0..63 {
            let expected = from + (to - from) * pos as f32 / 63.0;
            assert_eq!(fader.gain(pos).to_bits(), expected.to_bits(), "pos = {}", pos);
        }
    }

    #[test]
    fn constant_when_bits_match() {
        assert!(Fader::new(0.5, 0.5, 64).is_constant());
        assert!(!Fader::new(0.5, 0.25, 64).is_constant());
        assert!(!Fader::new(0.0, -0.0, 64).is_constant());
    }
}
