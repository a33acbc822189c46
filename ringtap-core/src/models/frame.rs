/// Sample type carried through the whole pipeline: 32-bit float, one
/// amplitude value per channel per frame.
pub type Sample = f32;

/// Amplitude written for channels that carry no signal.
pub const SILENCE: Sample = 0.0;

/// One sampled instant across all channels.
///
/// Always holds two slots; in mono configurations only `left` is
/// meaningful and only `left` is serialized. Frames are immutable once
/// produced and are copied by value from the capture callback through
/// the ring buffer into block storage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub left: Sample,
    pub right: Sample,
}

impl Frame {
    /// A mono frame; the right slot is silence.
    pub fn mono(sample: Sample) -> Self {
        Self { left: sample, right: SILENCE }
    }

    pub fn stereo(left: Sample, right: Sample) -> Self {
        Self { left, right }
    }

    /// An all-silence frame, pushed when the device delivers no input.
    pub fn silence() -> Self {
        Self { left: SILENCE, right: SILENCE }
    }

    /// Sample for channel `index` (0 = left, 1 = right).
    pub fn channel(&self, index: usize) -> Sample {
        match index {
            0 => self.left,
            1 => self.right,
            _ => SILENCE,
        }
    }
}
