use std::time::Duration;

/// How the drain thread behaves when the ring buffer is momentarily
/// empty.
///
/// The drain loop is a poll loop by design — its exit condition is
/// re-checked every iteration, which keeps shutdown latency bounded.
/// The idle step controls what an empty poll costs:
///
/// - `Spin`: pure busy-wait (`spin_loop` hint). Lowest drain latency,
///   pegs a core.
/// - `Yield`: give up the timeslice. The default; drain latency stays
///   far below one ring-fill window on any reasonable scheduler.
/// - `Sleep`: fixed sleep between empty polls. Keep it well under
///   `ring_secs` or the ring can fill while the consumer sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPolicy {
    Spin,
    #[default]
    Yield,
    Sleep(Duration),
}

impl PollPolicy {
    /// One idle step of the drain loop.
    pub(crate) fn idle(&self) {
        match self {
            PollPolicy::Spin => std::hint::spin_loop(),
            PollPolicy::Yield => std::thread::yield_now(),
            PollPolicy::Sleep(d) => std::thread::sleep(*d),
        }
    }
}

/// Configuration for a capture session.
///
/// These were compile-time constants in older recorders; here they are
/// explicit construction parameters, fixed for the lifetime of the
/// session (no runtime reconfiguration of buffer sizes).
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,

    /// Number of channels, 1 = mono or 2 = stereo interleaved (default: 2).
    pub channels: u16,

    /// Frames delivered per engine callback (default: 512). A hint
    /// passed to the engine when the input stream is opened.
    pub frames_per_buffer: usize,

    /// Ring buffer length in seconds of audio (default: 1.0).
    /// Ring capacity in frames = `ring_secs * sample_rate`.
    pub ring_secs: f64,

    /// Frames per storage block (default: 5x one second at 44100 Hz).
    pub block_frames: usize,

    /// Idle behavior of the drain thread when the ring is empty.
    pub poll: PollPolicy,
}

impl CaptureConfig {
    /// Ring buffer capacity in frames.
    pub fn ring_frames(&self) -> usize {
        (self.ring_secs * self.sample_rate as f64) as usize
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if ![1, 2].contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if self.frames_per_buffer == 0 {
            return Err("frames per buffer must be positive".into());
        }
        if self.ring_frames() == 0 {
            return Err("ring buffer must hold at least one frame".into());
        }
        if self.block_frames == 0 {
            return Err("block capacity must be positive".into());
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            frames_per_buffer: 512,
            ring_secs: 1.0,
            block_frames: 44100 * 5,
            poll: PollPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(CaptureConfig::default().validate().is_ok());
    }

    #[test]
    fn ring_frames_follows_duration() {
        let config = CaptureConfig {
            sample_rate: 8000,
            ring_secs: 0.5,
            ..Default::default()
        };
        assert_eq!(config.ring_frames(), 4000);
    }

    #[test]
    fn rejects_bad_values() {
        let config = CaptureConfig { channels: 3, ..Default::default() };
        assert!(config.validate().is_err());

        let config = CaptureConfig { sample_rate: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = CaptureConfig { ring_secs: 0.0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = CaptureConfig { block_frames: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
