use std::f64::consts::TAU;

pub const TICK_SAMPLE_RATE: u32 = 48_000;
pub const TICK_LENGTH_SECS: f64 = 0.08;
const TICK_FREQ_START_HZ: f64 = 850.0;
const TICK_FREQ_END_HZ: f64 = 100.0;
const TICK_GAIN_START: f64 = 0.04;
const TICK_GAIN_END: f64 = 0.001;

/// Mono or interleaved PCM samples in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioTrack {
    pub fn silent(sample_rate: u32, channels: u16, secs: f64) -> Self {
        let frames = (secs.max(0.0) * f64::from(sample_rate)).round() as usize;
        Self {
            sample_rate,
            channels,
            samples: vec![0.0; frames * usize::from(channels)],
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.channels) / f64::from(self.sample_rate)
    }

    /// Raw little-endian `f32le` bytes, as `ffmpeg -f f32le` reads them.
    pub fn to_f32le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 4);
        for &s in &self.samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        bytes
    }
}

/// One tick voice at `t` seconds after its onset: a sine sweeping exponentially from 850 Hz down
/// to 100 Hz while the gain decays from 0.04 to 0.001.
pub fn tick_sample(t: f64) -> f32 {
    if !(0.0..TICK_LENGTH_SECS).contains(&t) {
        return 0.0;
    }
    let k = (TICK_FREQ_END_HZ / TICK_FREQ_START_HZ).ln() / TICK_LENGTH_SECS;
    let phase = TAU * TICK_FREQ_START_HZ * ((k * t).exp() - 1.0) / k;
    let gain = TICK_GAIN_START * (TICK_GAIN_END / TICK_GAIN_START).powf(t / TICK_LENGTH_SECS);
    (gain * phase.sin()) as f32
}

/// Render a mono track of `total_secs` with one tick voice at each onset.
pub fn render_tick_track(onsets_secs: &[f64], total_secs: f64) -> AudioTrack {
    let mut track = AudioTrack::silent(TICK_SAMPLE_RATE, 1, total_secs);
    let rate = f64::from(TICK_SAMPLE_RATE);
    let voice_len = (TICK_LENGTH_SECS * rate).ceil() as usize;
    let len = track.samples.len();

    for &onset in onsets_secs.iter().filter(|s| s.is_finite() && **s >= 0.0) {
        let first = (onset * rate).round() as usize;
        if first >= len {
            continue;
        }
        for (i, out) in track.samples[first..len.min(first + voice_len)]
            .iter_mut()
            .enumerate()
        {
            *out += tick_sample(i as f64 / rate);
        }
    }

    for s in &mut track.samples {
        *s = s.clamp(-1.0, 1.0);
    }
    track
}

#[cfg(test)]
#[path = "../../tests/unit/audio/tone.rs"]
mod tests;
