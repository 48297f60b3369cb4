//! Offline host: crossfades two stereo WAV files block by block with the same
//! engine the JACK client runs.

use crate::cross_fader::{StereoIn, StereoOut};
use crate::xfade::{self, Controls, Variant, Xfade};
use std::io::{Read, Seek, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    WavError(#[from] hound::Error),

    #[error(transparent)]
    EngineError(#[from] xfade::Error),

    #[error("expected a stereo file, got {0} channels")]
    ChannelCount(u16),

    #[error("sample rates differ: {0} Hz and {1} Hz")]
    SampleRateMismatch(u32, u32),

    #[error("block size must be at least 1")]
    InvalidBlockSize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stereo {
    pub sample_rate: u32,
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl Stereo {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    // silence past the end of the file
    fn padded(&self, len: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = self.left.clone();
        let mut right = self.right.clone();
        left.resize(len, 0.0);
        right.resize(len, 0.0);
        (left, right)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub variant: Variant,
    pub controls: Controls,
    // when set, position moves from controls.position to this over the file,
    // one step per block
    pub end_position: Option<f32>,
    pub block: usize,
}

impl Settings {
    fn position(&self, block: usize, num_blocks: usize) -> f32 {
        match self.end_position {
            None => self.controls.position,
            Some(end) => {
                let start = self.controls.position;
                let steps = usize::max(1, num_blocks.saturating_sub(1));
                start + (end - start) * (block as f32 / steps as f32)
            }
        }
    }
}

pub fn read_stereo<R: Read>(reader: hound::WavReader<R>) -> Result<Stereo, Error> {
    let spec = reader.spec();
    if spec.channels != 2 {
        return Err(Error::ChannelCount(spec.channels));
    }
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|sample| sample as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };
    let (left, right): (Vec<f32>, Vec<f32>) = samples
        .chunks_exact(2)
        .map(|frame| (frame[0], frame[1]))
        .unzip();
    Ok(Stereo {
        sample_rate: spec.sample_rate,
        left,
        right,
    })
}

pub fn write_stereo<W: Write + Seek>(writer: W, audio: &Stereo) -> Result<(), Error> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::new(writer, spec)?;
    for (left, right) in audio.left.iter().zip(audio.right.iter()) {
        writer.write_sample(*left)?;
        writer.write_sample(*right)?;
    }
    writer.finalize()?;
    Ok(())
}

pub fn render(a: &Stereo, b: &Stereo, settings: &Settings) -> Result<Stereo, Error> {
    if a.sample_rate != b.sample_rate {
        return Err(Error::SampleRateMismatch(a.sample_rate, b.sample_rate));
    }
    if settings.block == 0 {
        return Err(Error::InvalidBlockSize);
    }

    let mut xfade = Xfade::create(a.sample_rate as f64, settings.variant)?;

    let len = usize::max(a.len(), b.len());
    let (a_left, a_right) = a.padded(len);
    let (b_left, b_right) = b.padded(len);
    let mut left = vec![0.0; len];
    let mut right = vec![0.0; len];

    let num_blocks = (len + settings.block - 1) / settings.block;
    let mut controls = settings.controls;
    for block in 0..num_blocks {
        let range = block * settings.block..usize::min(len, (block + 1) * settings.block);
        controls.position = settings.position(block, num_blocks);
        xfade.process(
            &controls,
            StereoIn::new(&a_left[range.clone()], &a_right[range.clone()]),
            StereoIn::new(&b_left[range.clone()], &b_right[range.clone()]),
            StereoOut::new(&mut left[range.clone()], &mut right[range]),
        );
    }
    debug!(
        "Rendered {} blocks, final gains {:?}",
        num_blocks,
        xfade.committed()
    );

    Ok(Stereo {
        sample_rate: a.sample_rate,
        left,
        right,
    })
}

pub fn render_files(a: &Path, b: &Path, out: &Path, settings: &Settings) -> Result<(), Error> {
    let audio_a = read_stereo(hound::WavReader::open(a)?)?;
    let audio_b = read_stereo(hound::WavReader::open(b)?)?;
    let mixed = render(&audio_a, &audio_b, settings)?;
    let file = std::io::BufWriter::new(std::fs::File::create(out).map_err(hound::Error::from)?);
    write_stereo(file, &mixed)?;
    info!(
        "Wrote {} ({} samples at {} Hz)",
        out.display(),
        mixed.len(),
        mixed.sample_rate
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::io::Cursor;

    fn noise(seed: u64, len: usize) -> Stereo {
        let mut rng = StdRng::seed_from_u64(seed);
        Stereo {
            sample_rate: 48000,
            left: (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect(),
            right: (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect(),
        }
    }

    fn settings(position: f32, end_position: Option<f32>, block: usize) -> Settings {
        Settings {
            variant: Variant::Basic,
            controls: Controls {
                position,
                ..Controls::default()
            },
            end_position,
            block,
        }
    }

    #[test]
    fn full_b_passes_b_after_first_ramp() {
        let a = noise(1, 1000);
        let b = noise(2, 1000);
        let mixed = render(&a, &b, &settings(1.0, None, 128)).unwrap();
        assert_eq!(mixed.len(), 1000);
        assert_eq!(mixed.left[0], a.left[0] + b.left[0]);
        assert_eq!(&mixed.left[64..], &b.left[64..]);
        assert_eq!(&mixed.right[64..], &b.right[64..]);
    }

    #[test]
    fn sweep_ends_on_b() {
        let a = noise(3, 1000);
        let b = noise(4, 1000);
        let mixed = render(&a, &b, &settings(-1.0, Some(1.0), 100)).unwrap();
        // first block ramps B from unity down to silence
        assert_eq!(&mixed.left[64..100], &a.left[64..100]);
        // last block sits at position 1 once its ramp is done
        assert_eq!(&mixed.left[964..], &b.left[964..]);
    }

    #[test]
    fn sweep_positions() {
        let s = settings(-1.0, Some(1.0), 10);
        assert_eq!(s.position(0, 5), -1.0);
        assert_eq!(s.position(2, 5), 0.0);
        assert_eq!(s.position(4, 5), 1.0);
        assert_eq!(s.position(0, 1), -1.0);
        assert_eq!(settings(0.5, None, 10).position(3, 5), 0.5);
    }

    #[test]
    fn shorter_input_is_padded() {
        let a = noise(5, 300);
        let b = noise(6, 500);
        let mixed = render(&a, &b, &settings(-1.0, None, 64)).unwrap();
        assert_eq!(mixed.len(), 500);
        assert!(mixed.left[300..].iter().all(|sample| *sample == 0.0));
    }

    #[test]
    fn rejects_bad_input() {
        let a = noise(7, 10);
        let mut b = noise(8, 10);
        assert!(matches!(
            render(&a, &b, &settings(0.0, None, 0)),
            Err(Error::InvalidBlockSize)
        ));
        b.sample_rate = 44100;
        assert!(matches!(
            render(&a, &b, &settings(0.0, None, 64)),
            Err(Error::SampleRateMismatch(48000, 44100))
        ));
    }

    #[test]
    fn wav_round_trip() {
        let audio = noise(9, 257);
        let mut buffer = Cursor::new(Vec::new());
        write_stereo(&mut buffer, &audio).unwrap();
        buffer.set_position(0);
        let read = read_stereo(hound::WavReader::new(buffer).unwrap()).unwrap();
        assert_eq!(read, audio);
    }

    #[test]
    fn reads_integer_wav() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
            for sample in [16384i16, -32768, 0, 32767] {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }
        buffer.set_position(0);
        let read = read_stereo(hound::WavReader::new(buffer).unwrap()).unwrap();
        assert_eq!(read.sample_rate, 44100);
        assert_eq!(read.left, vec![0.5, 0.0]);
        assert_eq!(read.right[0], -1.0);
    }

    #[test]
    fn rejects_mono_wav() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
            writer.write_sample(0.25f32).unwrap();
            writer.finalize().unwrap();
        }
        buffer.set_position(0);
        assert!(matches!(
            read_stereo(hound::WavReader::new(buffer).unwrap()),
            Err(Error::ChannelCount(1))
        ));
    }
}
