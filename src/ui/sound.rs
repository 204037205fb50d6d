/// Sound engine: procedural chiptune effects via rodio.
///
/// Every effect is rendered once at init into an in-memory WAV buffer.
/// Playback is fire-and-forget; a failed sink or decode is logged at
/// debug level and otherwise ignored.
///
/// Build without the "sound" feature (or set `[sound] enabled = false`)
/// to run silent; the stub SoundEngine does nothing.

/// Effects the game can trigger.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    /// Treasure found (normal or bonus round).
    Coin,
    /// Extra life or extra score tile.
    OneUp,
    /// Blank tile.
    Wrong,
    /// Last three seconds of a round.
    Tick,
    RoundClear,
    LifeLost,
    GameOver,
    BonusStart,
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const ALL_SFX: [Sfx; 8] = [
    Sfx::Coin,
    Sfx::OneUp,
    Sfx::Wrong,
    Sfx::Tick,
    Sfx::RoundClear,
    Sfx::LifeLost,
    Sfx::GameOver,
    Sfx::BonusStart,
];

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{Sfx, ALL_SFX};

    pub(super) const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        /// Indexed by `Sfx as usize`.
        buffers: Vec<Arc<Vec<u8>>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::info!("no audio output: {e}");
                    return None;
                }
            };
            let buffers = ALL_SFX
                .iter()
                .map(|&sfx| Arc::new(make_wav(&render(sfx))))
                .collect();
            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, sfx: Sfx) {
            let Some(buf) = self.buffers.get(sfx as usize) else { return };
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    log::debug!("sink for {sfx:?} failed: {e}");
                    return;
                }
            };
            match rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                Ok(src) => {
                    sink.append(src);
                    sink.detach();
                }
                Err(e) => log::debug!("decode of {sfx:?} failed: {e}"),
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators (mono f32 samples)
    // ════════════════════════════════════════════════════════════

    pub(super) fn render(sfx: Sfx) -> Vec<f32> {
        match sfx {
            // C6 → E6 → G6, bright
            Sfx::Coin => notes(&[1047.0, 1319.0, 1568.0], 0.045, 0.25, 3.0),
            // G5 → C6 → E6 → G6
            Sfx::OneUp => notes(&[784.0, 1047.0, 1319.0, 1568.0], 0.06, 0.25, 2.0),
            Sfx::Wrong => buzz(),
            Sfx::Tick => notes(&[880.0], 0.03, 0.2, 2.0),
            // C5 → E5 → G5 → C6
            Sfx::RoundClear => notes(&[523.0, 659.0, 784.0, 1047.0], 0.1, 0.3, 2.0),
            // A4 → F4
            Sfx::LifeLost => notes(&[440.0, 349.0], 0.14, 0.3, 2.0),
            // A4 → F#4 → Eb4 → C4, faded
            Sfx::GameOver => fade_tail(notes(&[440.0, 370.0, 311.0, 261.0], 0.16, 0.3, 1.0)),
            Sfx::BonusStart => sweep(400.0, 1600.0, 0.3),
        }
    }

    /// A run of notes; `harmonic` mixes in an overtone for a retro edge.
    fn notes(freqs: &[f32], note_dur: f32, volume: f32, harmonic: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * note_dur) as usize;
        let mut samples = Vec::with_capacity(n * freqs.len());
        for &freq in freqs {
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * std::f32::consts::TAU).sin() * 0.7
                    + (t * freq * harmonic * std::f32::consts::TAU).sin() * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Low detuned buzz for a miss.
    fn buzz() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.18) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - i as f32 / n as f32;
                let a = (t * 110.0 * std::f32::consts::TAU).sin().signum();
                let b = (t * 116.0 * std::f32::consts::TAU).sin().signum();
                (a + b) * 0.5 * env * 0.2
            })
            .collect()
    }

    /// Rising pitch sweep.
    fn sweep(from: f32, to: f32, duration: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = from + (to - from) * p;
                phase += freq / SAMPLE_RATE as f32;
                (phase * std::f32::consts::TAU).sin() * (1.0 - p).powf(0.3) * 0.25
            })
            .collect()
    }

    fn fade_tail(mut samples: Vec<f32>) -> Vec<f32> {
        let total = samples.len();
        let fade_len = total / 4;
        for (k, s) in samples[total - fade_len..].iter_mut().enumerate() {
            *s *= 1.0 - k as f32 / fade_len.max(1) as f32;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits_per_sample: u16 = 16;
        let block_align: u16 = bits_per_sample / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: no-op stub without the sound feature
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}
