//! Capture session: owns the engine boundary, the ring buffer, the
//! drain thread, and the block store.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::models::config::CaptureConfig;
use crate::models::error::CaptureError;
use crate::models::frame::Frame;
use crate::models::recording::{RecordingMetadata, RecordingSummary};
use crate::models::state::SessionState;
use crate::processing::ring_buffer::{Consumer, RingBuffer};
use crate::storage::block_store::BlockStore;
use crate::storage::{metadata, raw_export};
use crate::traits::capture_engine::{CallbackStatus, CaptureEngine};

/// Counters shared between the real-time callback, the drain thread,
/// and the session. Relaxed increments only — these are diagnostics,
/// not synchronization.
#[derive(Default)]
struct CaptureStats {
    frames_captured: AtomicU64,
    frames_dropped: AtomicU64,
}

/// Snapshot of session counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureDiagnostics {
    /// Frames accepted by the ring buffer since the session was created.
    pub frames_captured: u64,
    /// Frames dropped at the ring buffer under overrun.
    pub frames_dropped: u64,
    /// Frames currently held in block storage.
    pub frames_stored: u64,
    /// Blocks currently allocated.
    pub blocks: usize,
}

/// Audio capture session.
///
/// Owns one [`CaptureEngine`] backend, a fresh SPSC ring buffer per
/// recording cycle, the drain thread, and the growable block store.
/// Exactly two execution contexts touch the ring while recording: the
/// engine's real-time callback (producer) and the drain thread
/// (consumer). The block store is written only by the drain thread
/// while recording and only by the calling thread during export/clear
/// while stopped — the state machine enforces the single-writer
/// discipline.
///
/// Overrun policy: if the consumer cannot keep up and the ring fills,
/// the callback drops the newest frames and counts them. That loss is
/// deliberate — the real-time contract forbids blocking the device.
///
/// Successive start/stop cycles append to the same block store; only
/// [`clear`](Self::clear) empties it.
pub struct CaptureSession<E: CaptureEngine> {
    engine: E,
    config: CaptureConfig,
    state: SessionState,
    store: Arc<Mutex<BlockStore>>,
    stats: Arc<CaptureStats>,
    draining: Arc<AtomicBool>,
    drain_handle: Option<thread::JoinHandle<()>>,
}

impl<E: CaptureEngine> CaptureSession<E> {
    /// Create an idle session. Fails if the configuration is invalid.
    pub fn new(engine: E, config: CaptureConfig) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::InvalidState)?;
        let store = BlockStore::new(config.block_frames, config.channels as usize);
        Ok(Self {
            engine,
            config,
            state: SessionState::Idle,
            store: Arc::new(Mutex::new(store)),
            stats: Arc::new(CaptureStats::default()),
            draining: Arc::new(AtomicBool::new(false)),
            drain_handle: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Whether the engine reports its stream as delivering buffers.
    pub fn engine_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        let store = self.store.lock();
        CaptureDiagnostics {
            frames_captured: self.stats.frames_captured.load(Ordering::Relaxed),
            frames_dropped: self.stats.frames_dropped.load(Ordering::Relaxed),
            frames_stored: store.total_frames(),
            blocks: store.block_count(),
        }
    }

    /// Open the input stream and begin capturing.
    ///
    /// Builds a fresh ring buffer for this cycle, binds the producer
    /// half into the engine callback, starts the engine, then spawns
    /// the drain thread. On engine failure nothing is spawned and the
    /// session state is unchanged.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.state.is_recording() {
            return Err(CaptureError::AlreadyActive);
        }

        let (mut producer, consumer) = RingBuffer::with_capacity(self.config.ring_frames());

        let channels = self.config.channels as usize;
        let stats = Arc::clone(&self.stats);
        let callback = Box::new(move |samples: &[f32]| {
            // Real-time context: per-frame push only, no locks, no
            // allocation. A trailing partial frame is ignored.
            for chunk in samples.chunks_exact(channels) {
                let frame = if channels == 2 {
                    Frame::stereo(chunk[0], chunk[1])
                } else {
                    Frame::mono(chunk[0])
                };
                if producer.push(frame) {
                    stats.frames_captured.fetch_add(1, Ordering::Relaxed);
                } else {
                    stats.frames_dropped.fetch_add(1, Ordering::Relaxed);
                }
            }
            CallbackStatus::Continue
        });

        self.engine.start(&self.config, callback)?;

        self.draining.store(true, Ordering::Release);
        self.drain_handle = Some(spawn_drain(
            consumer,
            Arc::clone(&self.store),
            Arc::clone(&self.draining),
            self.config.clone(),
        ));

        self.state = SessionState::Recording;
        log::debug!(
            "capture started: {} Hz, {} ch, ring {} frames",
            self.config.sample_rate,
            self.config.channels,
            self.config.ring_frames()
        );
        Ok(())
    }

    /// Stop the stream and join the drain thread.
    ///
    /// The join is what guarantees no pop races session teardown. Even
    /// when the engine fails to stop cleanly the drain thread is still
    /// joined before the error is returned — captured data is
    /// preserved best-effort.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        if !self.state.is_recording() {
            return Err(CaptureError::NotActive);
        }

        let (engine_result, join_result) = self.stop_engine_and_join();
        self.state = SessionState::Stopped;

        // The drain loop always exits once the flag clears; a failed
        // join means the thread panicked, which is a bug in this crate.
        join_result.expect("capture drain thread panicked");

        let diag = self.diagnostics();
        log::debug!(
            "capture stopped: {} frames in {} blocks",
            diag.frames_stored,
            diag.blocks
        );
        if diag.frames_dropped > 0 {
            log::warn!("{} frames dropped under overrun", diag.frames_dropped);
        }

        engine_result
    }

    /// Serialize every stored block, in order, as a raw interleaved
    /// little-endian f32 dump. Returns the bytes written.
    pub fn export_to<W: Write>(&self, sink: &mut W) -> Result<u64, CaptureError> {
        if self.state.is_recording() {
            return Err(CaptureError::InvalidState("export during capture".into()));
        }
        raw_export::write_store(&self.store.lock(), sink)
    }

    /// Export to a file, compute its checksum, and write the metadata
    /// sidecar next to it.
    pub fn export_to_path(&self, path: &Path) -> Result<RecordingSummary, CaptureError> {
        if self.state.is_recording() {
            return Err(CaptureError::InvalidState("export during capture".into()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CaptureError::Io(format!("failed to create directory: {}", e)))?;
        }
        let file = File::create(path)
            .map_err(|e| CaptureError::Io(format!("failed to create file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        let bytes_written = raw_export::write_store(&self.store.lock(), &mut writer)?;
        drop(writer);

        let checksum = raw_export::sha256_file(path)?;
        let frames = self.store.lock().total_frames();
        let duration_secs = frames as f64 / self.config.sample_rate as f64;
        let meta = RecordingMetadata::new(
            duration_secs,
            self.config.sample_rate,
            self.config.channels,
            frames,
            self.stats.frames_dropped.load(Ordering::Relaxed),
            &checksum,
            &path.to_string_lossy(),
        );
        metadata::write_metadata(&meta, path)?;

        Ok(RecordingSummary {
            file_path: path.to_path_buf(),
            bytes_written,
            metadata: meta,
        })
    }

    /// Empty the block store, releasing all memory. Rejected while
    /// recording — the drain thread owns the store then.
    pub fn clear(&mut self) -> Result<(), CaptureError> {
        if self.state.is_recording() {
            return Err(CaptureError::InvalidState("clear during capture".into()));
        }
        self.store.lock().clear();
        Ok(())
    }

    fn stop_engine_and_join(&mut self) -> (Result<(), CaptureError>, thread::Result<()>) {
        let engine_result = self.engine.stop();
        self.draining.store(false, Ordering::Release);
        let join_result = match self.drain_handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        };
        (engine_result, join_result)
    }
}

impl<E: CaptureEngine> Drop for CaptureSession<E> {
    /// Route destruction through an implicit stop so the drain thread
    /// never outlives the ring buffer it pops from.
    fn drop(&mut self) {
        if !self.state.is_recording() {
            return;
        }
        let (engine_result, join_result) = self.stop_engine_and_join();
        if let Err(e) = engine_result {
            log::warn!("engine stop failed during session drop: {}", e);
        }
        if join_result.is_err() {
            // Cannot panic out of drop; the thread already carried the
            // panic payload.
            log::error!("capture drain thread panicked");
        }
    }
}

/// Spawn the consumer thread.
///
/// Pops frames in batches into a reusable scratch buffer and appends
/// them under a single store lock per batch. When the active flag
/// clears, drains whatever the producer managed to push before the
/// stream stopped, so no accepted frame is lost on shutdown.
fn spawn_drain(
    mut consumer: Consumer<Frame>,
    store: Arc<Mutex<BlockStore>>,
    draining: Arc<AtomicBool>,
    config: CaptureConfig,
) -> thread::JoinHandle<()> {
    let batch = config.frames_per_buffer.max(1);
    let poll = config.poll;

    thread::Builder::new()
        .name("capture-drain".into())
        .spawn(move || {
            let mut scratch: Vec<Frame> = Vec::with_capacity(batch);
            loop {
                let active = draining.load(Ordering::Acquire);

                scratch.clear();
                while scratch.len() < batch {
                    match consumer.pop() {
                        Some(frame) => scratch.push(frame),
                        None => break,
                    }
                }

                if !scratch.is_empty() {
                    store.lock().append_many(&scratch);
                } else if active {
                    poll.idle();
                }

                if !active && scratch.is_empty() {
                    break; // stream stopped and the ring is drained
                }
            }
        })
        .expect("failed to spawn capture drain thread")
}
