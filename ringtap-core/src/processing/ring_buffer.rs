//! Lock-free single-producer/single-consumer ring buffer.
//!
//! The producer side is meant to be driven from a real-time audio
//! callback: `push` never blocks, never allocates, and never takes a
//! lock. The consumer side is a background drain thread. Splitting the
//! buffer into [`Producer`] and [`Consumer`] halves makes the SPSC
//! discipline a compile-time property rather than a usage convention.
//!
//! One slot is always kept empty so that only the two cursors are
//! needed to tell full from empty: `head == tail` means empty,
//! `tail + 1 == head` (mod slot count) means full.
//!
//! ## Memory ordering
//!
//! The producer owns `tail`, the consumer owns `head`. Each side reads
//! its own cursor relaxed, reads the other side's cursor with Acquire,
//! and publishes its own advance with Release:
//!
//! - a consumer that observes the new `tail` is guaranteed to see the
//!   fully written element;
//! - a producer that observes the new `head` is guaranteed the consumer
//!   finished copying the slot before it is reused on wraparound.
//!
//! This Release/Acquire pairing is the entire correctness argument.
//! Relaxed ordering on the cross-thread loads would break visibility
//! and is not a valid optimization.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Inner<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
    /// Next slot to pop. Advanced only by the consumer.
    head: AtomicUsize,
    /// Next slot to push. Advanced only by the producer.
    tail: AtomicUsize,
}

// SAFETY: a slot is written only by the producer at `tail` and read only
// by the consumer at `head`; the one-slot-empty invariant means those
// are never the same slot, and the Release/Acquire cursor handoff
// orders the accesses. `T: Copy` rules out drop obligations for
// elements still in flight when the buffer is dropped.
unsafe impl<T: Copy + Send> Send for Inner<T> {}
unsafe impl<T: Copy + Send> Sync for Inner<T> {}

impl<T> Inner<T> {
    fn advance(&self, idx: usize) -> usize {
        (idx + 1) % self.slots.len()
    }

    fn len(&self) -> usize {
        let slots = self.slots.len();
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (tail + slots - head) % slots
    }
}

/// Fixed-capacity SPSC ring buffer of `Copy` elements.
///
/// Construction-only type: [`RingBuffer::with_capacity`] hands back the
/// two halves. Capacity is fixed for the life of the buffer; growth
/// pressure is absorbed by the consumer draining fast enough, not by
/// the queue.
pub struct RingBuffer;

impl RingBuffer {
    /// Allocate a buffer able to hold `capacity` elements and split it
    /// into its producer and consumer halves. `capacity + 1` slots are
    /// allocated; the spare slot disambiguates full from empty.
    pub fn with_capacity<T: Copy + Send>(capacity: usize) -> (Producer<T>, Consumer<T>) {
        assert!(capacity > 0, "ring buffer capacity must be positive");
        let slots = (0..capacity + 1)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        let inner = Arc::new(Inner {
            slots,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        });
        (
            Producer { inner: Arc::clone(&inner) },
            Consumer { inner },
        )
    }
}

/// Write half. Exactly one exists per buffer; moving it into the audio
/// callback closure is what enforces the single-producer discipline.
pub struct Producer<T: Copy + Send> {
    inner: Arc<Inner<T>>,
}

impl<T: Copy + Send> Producer<T> {
    /// Attempt to enqueue one element.
    ///
    /// Returns `false` with no side effect if the buffer is full; the
    /// element is dropped. Real-time safe: no blocking, no allocation,
    /// no locks.
    pub fn push(&mut self, item: T) -> bool {
        let tail = self.inner.tail.load(Ordering::Relaxed);
        let next = self.inner.advance(tail);
        if next == self.inner.head.load(Ordering::Acquire) {
            return false; // full
        }
        unsafe { (*self.inner.slots[tail].get()).write(item) };
        self.inner.tail.store(next, Ordering::Release);
        true
    }

    /// Snapshot full check. May be stale the instant it returns; for
    /// diagnostics only, never for correctness decisions.
    pub fn is_full(&self) -> bool {
        let tail = self.inner.tail.load(Ordering::Acquire);
        self.inner.advance(tail) == self.inner.head.load(Ordering::Acquire)
    }

    /// Elements the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.inner.slots.len() - 1
    }
}

/// Read half. Exactly one exists per buffer.
pub struct Consumer<T: Copy + Send> {
    inner: Arc<Inner<T>>,
}

impl<T: Copy + Send> Consumer<T> {
    /// Attempt to dequeue one element. Returns `None` if the buffer is
    /// empty. Never blocks.
    pub fn pop(&mut self) -> Option<T> {
        let head = self.inner.head.load(Ordering::Relaxed);
        if head == self.inner.tail.load(Ordering::Acquire) {
            return None; // empty
        }
        let item = unsafe { (*self.inner.slots[head].get()).assume_init_read() };
        self.inner.head.store(self.inner.advance(head), Ordering::Release);
        Some(item)
    }

    /// Snapshot empty check; diagnostic only, like [`Producer::is_full`].
    pub fn is_empty(&self) -> bool {
        self.inner.head.load(Ordering::Acquire) == self.inner.tail.load(Ordering::Acquire)
    }

    /// Snapshot of the number of queued elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn capacity(&self) -> usize {
        self.inner.slots.len() - 1
    }
}
