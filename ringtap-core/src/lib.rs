//! # ringtap-core
//!
//! Real-time-safe audio capture core.
//!
//! A fixed-capacity lock-free ring buffer decouples a hard-real-time
//! audio callback (the producer) from a background drain thread (the
//! consumer) that accumulates samples into growable fixed-size blocks
//! and later serializes them as a raw interleaved dump. Audio backends
//! implement the [`CaptureEngine`] trait and plug into the generic
//! [`CaptureSession`].
//!
//! ## Architecture
//!
//! ```text
//! ringtap-core (this crate)
//! ├── traits/       ← CaptureEngine boundary (start/stop/is_active + callback)
//! ├── models/       ← Frame, CaptureConfig, SessionState, CaptureError, metadata
//! ├── processing/   ← lock-free SPSC RingBuffer (Producer/Consumer halves)
//! ├── session/      ← CaptureSession (state machine, drain thread, export)
//! └── storage/      ← BlockStore, raw export, JSON sidecar metadata
//! ```
//!
//! ## Data flow
//!
//! ```text
//! [engine RT callback] → Producer::push → ring → Consumer::pop → BlockStore
//!                                                                    ↓ export
//!                                                         raw LE f32 dump + sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{CaptureConfig, PollPolicy};
pub use models::error::CaptureError;
pub use models::frame::{Frame, Sample, SILENCE};
pub use models::recording::{RecordingMetadata, RecordingSummary};
pub use models::state::SessionState;
pub use processing::ring_buffer::{Consumer, Producer, RingBuffer};
pub use session::capture::{CaptureDiagnostics, CaptureSession};
pub use storage::block_store::{Block, BlockStore};
pub use traits::capture_engine::{CallbackStatus, CaptureEngine, InputCallback};
