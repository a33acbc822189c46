use thiserror::Error;

/// Errors surfaced by capture session operations.
///
/// Nothing here is fatal to the process: every failure is returned to
/// the caller with session state left consistent. Overrun (the producer
/// outrunning the consumer) is deliberately *not* an error — it is a
/// documented drop policy, observable through the session diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The audio engine failed to open, start, or stop the stream.
    /// Carries the engine's human-readable message; the code is opaque
    /// to the core.
    #[error("device error: {0}")]
    Device(String),

    /// The export sink could not be opened or written. Samples already
    /// written before the failure are not rolled back.
    #[error("I/O error: {0}")]
    Io(String),

    /// `start` was called while a capture is already running.
    #[error("capture already active")]
    AlreadyActive,

    /// `stop` was called with no capture running.
    #[error("no active capture")]
    NotActive,

    /// The operation is not permitted in the current session state,
    /// e.g. `clear` or export while recording.
    #[error("invalid state: {0}")]
    InvalidState(String),
}
