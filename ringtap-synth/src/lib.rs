//! # ringtap-synth
//!
//! Synthetic frame-generator backend for `ringtap-core`.
//!
//! Implements the [`CaptureEngine`] boundary with a generator thread
//! instead of a real audio device, so the capture pipeline can be
//! exercised end to end without any host audio subsystem. Useful as a
//! development backend and as the reference for writing device-backed
//! engines.
//!
//! ```no_run
//! use ringtap_core::{CaptureConfig, CaptureSession};
//! use ringtap_synth::{Pacing, SynthEngine, Waveform};
//!
//! let engine = SynthEngine::new(Waveform::Sine { freq: 440.0 }, Pacing::Realtime);
//! let mut session = CaptureSession::new(engine, CaptureConfig::default()).unwrap();
//! session.start().unwrap();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use ringtap_core::{
    CallbackStatus, CaptureConfig, CaptureEngine, CaptureError, InputCallback, Sample, SILENCE,
};

/// Signal produced by the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    /// Sine wave at `freq` Hz, unit amplitude.
    Sine { freq: f32 },
    /// Frame index as the sample value. Not audio — a deterministic
    /// staircase that makes ordering and loss visible in tests.
    Ramp,
    Silence,
}

/// Delivery cadence of the generator thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// One buffer per real buffer-duration, like a device stream.
    Realtime,
    /// Back-to-back buffers with no sleep. Floods the ring; handy for
    /// overrun exercises.
    Unpaced,
}

/// Synthetic capture engine.
///
/// `start` spawns a named generator thread that synthesizes
/// `frames_per_buffer` frames per iteration and hands them to the
/// session callback; `stop` signals the thread and joins it.
pub struct SynthEngine {
    waveform: Waveform,
    pacing: Pacing,
    running: Arc<AtomicBool>,
    generator_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl SynthEngine {
    pub fn new(waveform: Waveform, pacing: Pacing) -> Self {
        Self {
            waveform,
            pacing,
            running: Arc::new(AtomicBool::new(false)),
            generator_handle: Mutex::new(None),
        }
    }

    /// Real-time paced sine generator, the closest stand-in for a mic.
    pub fn sine(freq: f32) -> Self {
        Self::new(Waveform::Sine { freq }, Pacing::Realtime)
    }
}

impl CaptureEngine for SynthEngine {
    fn start(
        &mut self,
        config: &CaptureConfig,
        callback: InputCallback,
    ) -> Result<(), CaptureError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(CaptureError::Device("generator already running".into()));
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let frames_per_buffer = config.frames_per_buffer;
        let config = config.clone();
        let waveform = self.waveform;
        let pacing = self.pacing;

        let handle = thread::Builder::new()
            .name("synth-generator".into())
            .spawn(move || {
                generator_loop(&running, &config, waveform, pacing, callback);
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::Device(format!("failed to spawn generator thread: {}", e))
            })?;

        *self.generator_handle.lock() = Some(handle);
        log::debug!(
            "synth generator started: {:?} {:?}, {} frames/buffer",
            self.waveform,
            self.pacing,
            frames_per_buffer
        );
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.generator_handle.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Generator loop running on the dedicated thread.
///
/// Synthesizes one interleaved buffer per iteration, delivers it, and
/// honors a `Stop` verdict from the callback the way a device stream
/// would.
fn generator_loop(
    running: &AtomicBool,
    config: &CaptureConfig,
    waveform: Waveform,
    pacing: Pacing,
    mut callback: InputCallback,
) {
    let channels = config.channels as usize;
    let frames = config.frames_per_buffer;
    let period = Duration::from_secs_f64(frames as f64 / config.sample_rate as f64);
    let mut buffer = vec![SILENCE; frames * channels];
    let mut position: u64 = 0;

    while running.load(Ordering::SeqCst) {
        for i in 0..frames {
            let sample = synthesize(waveform, config.sample_rate, position + i as u64);
            buffer[i * channels] = sample;
            if channels == 2 {
                buffer[i * channels + 1] = sample;
            }
        }
        position += frames as u64;

        if callback(&buffer) == CallbackStatus::Stop {
            break;
        }
        if pacing == Pacing::Realtime {
            thread::sleep(period);
        }
    }
}

fn synthesize(waveform: Waveform, sample_rate: u32, frame_index: u64) -> Sample {
    match waveform {
        Waveform::Sine { freq } => {
            let t = frame_index as f32 / sample_rate as f32;
            (std::f32::consts::TAU * freq * t).sin()
        }
        Waveform::Ramp => frame_index as Sample,
        Waveform::Silence => SILENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_is_the_frame_index() {
        assert_eq!(synthesize(Waveform::Ramp, 8000, 0), 0.0);
        assert_eq!(synthesize(Waveform::Ramp, 8000, 41), 41.0);
    }

    #[test]
    fn sine_starts_at_zero_crossing() {
        let first = synthesize(Waveform::Sine { freq: 440.0 }, 44100, 0);
        assert_eq!(first, 0.0);
        let later = synthesize(Waveform::Sine { freq: 440.0 }, 44100, 25);
        assert!(later.abs() <= 1.0);
    }

    #[test]
    fn silence_is_silent() {
        assert_eq!(synthesize(Waveform::Silence, 44100, 123), SILENCE);
    }
}
