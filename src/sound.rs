use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::warn;

const TONE_HZ: f32 = 440.0;
const TONE_MS: u64 = 80;

/// Host-side beeper for the sound timer's one-shot tone.
pub struct Sound {
    device: cpal::Device,
    config: cpal::StreamConfig,
    format: cpal::SampleFormat,
}

impl Sound {
    /// None when the host has no usable output device; the machine runs fine
    /// without audio.
    pub fn try_new() -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;
        let supported = device
            .supported_output_configs()
            .ok()?
            .next()?
            .with_max_sample_rate();
        let format = supported.sample_format();
        Some(Self {
            device,
            config: supported.into(),
            format,
        })
    }

    pub fn beep(&self) {
        match self.format {
            cpal::SampleFormat::I16 => self.run::<i16>(),
            cpal::SampleFormat::U16 => self.run::<u16>(),
            cpal::SampleFormat::F32 => self.run::<f32>(),
            other => warn!("unsupported sample format {other}"),
        }
    }

    fn run<T>(&self)
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = self.config.sample_rate.0 as f32;
        let channels = self.config.channels as usize;

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin()
        };

        let stream = match self.device.build_output_stream(
            &self.config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                Self::write_data(data, channels, &mut next_value)
            },
            |err| warn!("audio stream error: {err}"),
            None,
        ) {
            Ok(stream) => stream,
            Err(err) => {
                warn!("could not open audio stream: {err}");
                return;
            }
        };

        if stream.play().is_ok() {
            std::thread::sleep(std::time::Duration::from_millis(TONE_MS));
        }
    }

    fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
    where
        T: Sample + FromSample<f32>,
    {
        for frame in output.chunks_mut(channels) {
            let value: T = T::from_sample(next_sample());
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}
