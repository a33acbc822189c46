use crate::models::config::CaptureConfig;
use crate::models::error::CaptureError;
use crate::models::frame::Sample;

/// Value returned by the input callback to steer the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    /// Keep delivering buffers.
    Continue,
    /// Stop the stream after this buffer.
    Stop,
}

/// Callback invoked by the engine for every captured buffer.
///
/// `samples` is interleaved in channel order (left, right) with the
/// channel count negotiated at `start`; its length is
/// `frames * channels`. The callback runs on the engine's real-time
/// thread: it must not block, allocate, or take a lock. The engine
/// invokes it from exactly one thread at a time.
pub type InputCallback = Box<dyn FnMut(&[Sample]) -> CallbackStatus + Send + 'static>;

/// Capability interface for the external audio subsystem.
///
/// The core holds only this boundary, never a concrete backend, which
/// keeps the ring buffer and session logic testable against a
/// synthetic frame generator. Engine-specific error codes surface as
/// [`CaptureError::Device`] with a readable message.
pub trait CaptureEngine: Send {
    /// Open an input stream with the negotiated parameters and begin
    /// delivering buffers to `callback`. On failure no stream is left
    /// open and the callback is dropped.
    fn start(&mut self, config: &CaptureConfig, callback: InputCallback)
        -> Result<(), CaptureError>;

    /// Stop the stream and release the callback. Idempotence is up to
    /// the backend; the session never calls this twice for one start.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Whether the stream is currently delivering buffers. Safe to call
    /// from any thread.
    fn is_active(&self) -> bool;
}
