//! Audio cues as short sine beeps.
//!
//! A cue spawns a short-lived thread owning the output stream; playback
//! failures are logged and never reach the timer.

use std::f32::consts::PI;
use std::time::Duration;

use pausely_core::{Cue, CuePlayer};
use rodio::{OutputStream, Sink, Source};

/// Finite sine tone.
struct Tone {
    freq: f32,
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
}

impl Tone {
    fn new(freq: f32, duration_ms: u64) -> Self {
        let sample_rate = 44100;
        Self {
            freq,
            sample_rate,
            num_sample: 0,
            total_samples: (sample_rate as u64 * duration_ms / 1000) as usize,
        }
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        self.num_sample += 1;
        let t = self.num_sample as f32 / self.sample_rate as f32;
        Some((2.0 * PI * self.freq * t).sin() * 0.15)
    }
}

impl Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(
            self.total_samples as u64 * 1000 / self.sample_rate as u64,
        ))
    }
}

pub struct BeepCuePlayer;

impl CuePlayer for BeepCuePlayer {
    fn play(&self, cue: Cue) {
        let freq = match cue {
            Cue::Start => 880.0,
            Cue::Stop => 440.0,
        };
        std::thread::spawn(move || match OutputStream::try_default() {
            Ok((_stream, handle)) => match Sink::try_new(&handle) {
                Ok(sink) => {
                    sink.append(Tone::new(freq, 180));
                    sink.sleep_until_end();
                }
                Err(e) => log::warn!("audio cue failed: {e}"),
            },
            Err(e) => log::warn!("audio cue failed: {e}"),
        });
    }
}
