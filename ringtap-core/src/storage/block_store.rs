//! Growable storage for drained frames.
//!
//! The drain thread appends frames into fixed-capacity heap blocks; a
//! new block is allocated when the open tail block fills. Insertion
//! order is capture order. The store is append-only while a session is
//! recording, read-only during export, and emptied only by an explicit
//! `clear`.

use crate::models::frame::{Frame, Sample};

/// A fixed-capacity contiguous run of interleaved samples plus a fill
/// cursor counting frames. A block is either full or the single open
/// tail block being appended to.
#[derive(Debug)]
pub struct Block {
    samples: Box<[Sample]>,
    capacity_frames: usize,
    filled: usize,
}

impl Block {
    fn new(capacity_frames: usize, channels: usize) -> Self {
        Self {
            samples: vec![0.0; capacity_frames * channels].into_boxed_slice(),
            capacity_frames,
            filled: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.capacity_frames
    }

    /// Frames holding valid data.
    pub fn frames(&self) -> usize {
        self.filled
    }

    /// The valid interleaved samples: `filled * channels` of them.
    pub fn samples(&self) -> &[Sample] {
        let channels = self.samples.len() / self.capacity_frames;
        &self.samples[..self.filled * channels]
    }
}

/// Ordered, growable list of [`Block`]s.
#[derive(Debug)]
pub struct BlockStore {
    blocks: Vec<Block>,
    block_frames: usize,
    channels: usize,
}

impl BlockStore {
    pub fn new(block_frames: usize, channels: usize) -> Self {
        assert!(block_frames > 0, "block capacity must be positive");
        assert!(matches!(channels, 1 | 2), "unsupported channel count");
        Self {
            blocks: Vec::new(),
            block_frames,
            channels,
        }
    }

    /// Append one frame, allocating a new open block if the tail block
    /// is full (or no block exists yet).
    pub fn append(&mut self, frame: Frame) {
        let needs_block = match self.blocks.last() {
            Some(block) => block.is_full(),
            None => true,
        };
        if needs_block {
            self.blocks.push(Block::new(self.block_frames, self.channels));
        }

        let channels = self.channels;
        let block = self.blocks.last_mut().unwrap();
        let offset = block.filled * channels;
        block.samples[offset] = frame.left;
        if channels == 2 {
            block.samples[offset + 1] = frame.right;
        }
        block.filled += 1;
    }

    pub fn append_many(&mut self, frames: &[Frame]) {
        for &frame in frames {
            self.append(frame);
        }
    }

    /// Blocks in capture order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total frames stored across all blocks.
    pub fn total_frames(&self) -> u64 {
        self.blocks.iter().map(|b| b.frames() as u64).sum()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drop every block, releasing all storage.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}
