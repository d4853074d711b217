//! Counting semaphore for fingerprint slots.
//!
//! A bounded crossbeam channel holds one token per occupied slot: sending
//! acquires (and blocks once the channel is full), receiving releases.

use crossbeam_channel::{bounded, Receiver, Sender};

pub struct SlotSemaphore {
    acquire: Sender<()>,
    release: Receiver<()>,
}

impl SlotSemaphore {
    /// `limit` must be at least 1
    pub fn new(limit: usize) -> Self {
        let (acquire, release) = bounded(limit.max(1));
        Self { acquire, release }
    }

    /// Block until a slot is free, then hold it until the permit drops
    pub fn acquire(&self) -> SlotPermit {
        // Both ends live in `self`, so the channel cannot be disconnected here.
        let _ = self.acquire.send(());
        SlotPermit {
            release: self.release.clone(),
        }
    }
}

/// A held slot; dropping it frees the slot, whether the task succeeded or not
pub struct SlotPermit {
    release: Receiver<()>,
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        let _ = self.release.try_recv();
    }
}
