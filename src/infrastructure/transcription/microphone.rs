//! Microphone capture using cpal, encoded to mono FLAC

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::error::Verify;
use flacenc::source::MemSource;

use super::{AudioData, AudioMimeType, TranscriptionError};

const BITS_PER_SAMPLE: usize = 16;

/// An in-progress recording from the default input device.
///
/// Samples are collected by the audio driver's callback until `finish` is called.
pub struct Recording {
    stream: Stream,
    buffer: Arc<Mutex<Vec<i16>>>,
    channels: u16,
    sample_rate: u32,
}

impl Recording {
    /// Start recording from the default input device
    pub fn start() -> Result<Self, TranscriptionError> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or(TranscriptionError::NoAudioDevice)?;
        let supported = device
            .default_input_config()
            .map_err(|e| TranscriptionError::Recording(e.to_string()))?;

        let sample_format = supported.sample_format();
        let config = supported.config();
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let err_fn = |e: cpal::StreamError| tracing::error!(error = %e, "audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => {
                let buffer = Arc::clone(&buffer);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut samples) = buffer.lock() {
                            samples.extend_from_slice(data);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::F32 => {
                let buffer = Arc::clone(&buffer);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut samples) = buffer.lock() {
                            samples.extend(
                                data.iter()
                                    .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                            );
                        }
                    },
                    err_fn,
                    None,
                )
            }
            other => {
                return Err(TranscriptionError::Recording(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        }
        .map_err(|e| TranscriptionError::Recording(e.to_string()))?;

        stream
            .play()
            .map_err(|e| TranscriptionError::Recording(e.to_string()))?;

        tracing::info!(
            channels = config.channels,
            sample_rate = config.sample_rate.0,
            "microphone recording started"
        );

        Ok(Recording {
            stream,
            buffer,
            channels: config.channels,
            sample_rate: config.sample_rate.0,
        })
    }

    /// Stop recording and encode what was captured
    pub fn finish(self) -> Result<AudioData, TranscriptionError> {
        drop(self.stream);

        let samples = self
            .buffer
            .lock()
            .map(|mut b| std::mem::take(&mut *b))
            .map_err(|_| TranscriptionError::Recording("audio buffer poisoned".to_string()))?;

        if samples.is_empty() {
            return Err(TranscriptionError::NoSpeech);
        }

        let mono = to_mono(&samples, self.channels);
        let flac = encode_flac(&mono, self.sample_rate)?;
        Ok(AudioData::new(flac, AudioMimeType::Flac))
    }
}

/// Average interleaved channels into one
fn to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

fn encode_flac(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, TranscriptionError> {
    let samples: Vec<i32> = samples.iter().map(|&s| s as i32).collect();

    let config = flacenc::config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| TranscriptionError::Recording(format!("FLAC config: {:?}", e)))?;
    let source = MemSource::from_samples(&samples, 1, BITS_PER_SAMPLE, sample_rate as usize);

    let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| TranscriptionError::Recording(format!("FLAC encode: {:?}", e)))?;

    let mut sink = ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| TranscriptionError::Recording(format!("FLAC write: {}", e)))?;
    Ok(sink.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_mono_averages_frames() {
        assert_eq!(to_mono(&[10, 20, -4, 4], 2), vec![15, 0]);
        assert_eq!(to_mono(&[1, 2, 3], 1), vec![1, 2, 3]);
    }

    #[test]
    fn test_encode_flac_has_magic() {
        let silence = vec![0i16; 16_000];
        let flac = encode_flac(&silence, 16_000).unwrap();
        assert_eq!(&flac[0..4], b"fLaC");
    }
}
