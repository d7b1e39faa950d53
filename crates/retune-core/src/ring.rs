//! Lock-free single-producer/single-consumer frame FIFO.

use crate::frame::{AudioFrame, Sample};
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Bounded SPSC FIFO of multi-channel frames.
///
/// Storage is flat (`capacity * channels` samples) and allocated once at
/// construction; `write` and `read` never block and never allocate. One slot
/// is reserved so that the full and empty states are distinguishable:
/// `full ⇔ (write_pos + 1) % capacity == read_pos`.
///
/// # Concurrency
///
/// Safe for exactly one concurrent producer (calling [`write`]) and one
/// concurrent consumer (calling [`read`]): each index is published with a
/// Release store after its payload access and observed with an Acquire load,
/// so the payload never races. A second producer or consumer, and any use of
/// [`clear`], require external synchronization.
///
/// [`write`]: FrameRingBuffer::write
/// [`read`]: FrameRingBuffer::read
/// [`clear`]: FrameRingBuffer::clear
pub struct FrameRingBuffer {
    buffer: UnsafeCell<Vec<Sample>>,
    capacity: usize,
    channels: usize,
    write_pos: AtomicUsize,
    read_pos: AtomicUsize,
}

// SAFETY: the payload is only touched through `write` (producer side) and
// `read` (consumer side), whose disjoint regions are ordered by the
// Release/Acquire index handoff documented above.
unsafe impl Send for FrameRingBuffer {}
unsafe impl Sync for FrameRingBuffer {}

impl FrameRingBuffer {
    /// Create a ring holding up to `capacity - 1` frames of `channels`
    /// samples each.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2` (one slot is always reserved).
    pub fn new(capacity: usize, channels: usize) -> Self {
        assert!(capacity >= 2, "ring capacity must be at least 2");
        Self {
            buffer: UnsafeCell::new(vec![0.0; capacity * channels]),
            capacity,
            channels,
            write_pos: AtomicUsize::new(0),
            read_pos: AtomicUsize::new(0),
        }
    }

    /// Write as many frames as fit; never blocks. Returns the number of
    /// frames actually written. Frames with fewer channels than the ring are
    /// zero-padded; extra channels are dropped.
    pub fn write(&self, frames: &[AudioFrame]) -> usize {
        let mut write = self.write_pos.load(Ordering::Relaxed);
        let read = self.read_pos.load(Ordering::Acquire);

        let mut written = 0;
        for frame in frames {
            let next = (write + 1) % self.capacity;
            if next == read {
                break;
            }

            // SAFETY: slot `write` is outside the consumer's readable region
            // until the Release store below publishes it.
            let buffer = unsafe { &mut *self.buffer.get() };
            let base = write * self.channels;
            let samples = frame.samples();
            let n = samples.len().min(self.channels);
            buffer[base..base + n].copy_from_slice(&samples[..n]);
            buffer[base + n..base + self.channels].fill(0.0);

            write = next;
            written += 1;
        }

        self.write_pos.store(write, Ordering::Release);
        written
    }

    /// Read as many frames as available; never blocks. Returns the number of
    /// frames actually read. Destination channels beyond the ring's are
    /// zeroed.
    pub fn read(&self, frames: &mut [AudioFrame]) -> usize {
        let mut read = self.read_pos.load(Ordering::Relaxed);
        let write = self.write_pos.load(Ordering::Acquire);

        let mut count = 0;
        for frame in frames.iter_mut() {
            if read == write {
                break;
            }

            // SAFETY: slot `read` was published by the producer's Release
            // store and stays out of its writable region until the Release
            // store below returns it.
            let buffer = unsafe { &*self.buffer.get() };
            let base = read * self.channels;
            let samples = frame.samples_mut();
            let n = samples.len().min(self.channels);
            samples[..n].copy_from_slice(&buffer[base..base + n]);
            samples[n..].fill(0.0);

            read = (read + 1) % self.capacity;
            count += 1;
        }

        self.read_pos.store(read, Ordering::Release);
        count
    }

    /// Number of frames ready to read.
    pub fn available(&self) -> usize {
        let write = self.write_pos.load(Ordering::Acquire);
        let read = self.read_pos.load(Ordering::Acquire);
        (write + self.capacity - read) % self.capacity
    }

    /// Number of frames that can still be written. One slot is reserved, so
    /// this is `capacity - available - 1`.
    pub fn space(&self) -> usize {
        self.capacity - self.available() - 1
    }

    pub fn empty(&self) -> bool {
        self.write_pos.load(Ordering::Acquire) == self.read_pos.load(Ordering::Acquire)
    }

    pub fn full(&self) -> bool {
        let write = self.write_pos.load(Ordering::Acquire);
        let read = self.read_pos.load(Ordering::Acquire);
        (write + 1) % self.capacity == read
    }

    /// Drop all buffered frames and zero the payload.
    ///
    /// Not safe against a concurrent producer or consumer; callers must
    /// fence it against both sides.
    pub fn clear(&self) {
        // SAFETY: exclusive access is the documented precondition.
        let buffer = unsafe { &mut *self.buffer.get() };
        buffer.fill(0.0);
        self.read_pos.store(0, Ordering::Release);
        self.write_pos.store(0, Ordering::Release);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn frame(value: f32) -> AudioFrame {
        AudioFrame::from_samples(vec![value, -value])
    }

    #[test]
    fn test_write_read_roundtrip() {
        let ring = FrameRingBuffer::new(8, 2);
        let input: Vec<AudioFrame> = (0..4).map(|i| frame(i as f32)).collect();

        assert_eq!(ring.write(&input), 4);
        assert_eq!(ring.available(), 4);

        let mut output = vec![AudioFrame::new(2); 4];
        assert_eq!(ring.read(&mut output), 4);
        assert_eq!(input, output);
        assert!(ring.empty());
    }

    #[test]
    fn test_available_tracks_writes_minus_reads() {
        let ring = FrameRingBuffer::new(16, 1);
        let frames = vec![AudioFrame::from_samples(vec![1.0]); 10];
        let mut out = vec![AudioFrame::new(1); 10];

        assert_eq!(ring.write(&frames), 10);
        assert_eq!(ring.read(&mut out[..3]), 3);
        assert_eq!(ring.available(), 7);
        assert_eq!(ring.space(), 16 - 7 - 1);
    }

    #[test]
    fn test_overflow_rejects_writes() {
        let ring = FrameRingBuffer::new(5, 1);
        let frames: Vec<AudioFrame> =
            (0..6).map(|i| AudioFrame::from_samples(vec![i as f32])).collect();

        let written = ring.write(&frames);
        assert!(written <= 5);
        assert!(ring.full());
        assert_eq!(ring.space(), 0);

        // Further writes are rejected outright
        assert_eq!(ring.write(&frames[..1]), 0);
    }

    #[test]
    fn test_channel_mismatch_pads_and_drops() {
        let ring = FrameRingBuffer::new(4, 2);
        ring.write(&[AudioFrame::from_samples(vec![1.0])]);
        ring.write(&[AudioFrame::from_samples(vec![2.0, 3.0, 4.0])]);

        let mut out = vec![AudioFrame::new(2); 2];
        assert_eq!(ring.read(&mut out), 2);
        assert_eq!(out[0].samples(), &[1.0, 0.0]);
        assert_eq!(out[1].samples(), &[2.0, 3.0]);
    }

    #[test]
    fn test_clear() {
        let ring = FrameRingBuffer::new(4, 1);
        ring.write(&vec![AudioFrame::from_samples(vec![1.0]); 2]);
        ring.clear();
        assert!(ring.empty());
        assert_eq!(ring.available(), 0);
    }

    #[test]
    fn test_spsc_preserves_order_across_threads() {
        const COUNT: usize = 50_000;
        let ring = Arc::new(FrameRingBuffer::new(64, 1));

        let producer = {
            let ring = Arc::clone(&ring);
            std::thread::spawn(move || {
                let mut sent = 0usize;
                while sent < COUNT {
                    let frame = AudioFrame::from_samples(vec![sent as f32]);
                    if ring.write(core::slice::from_ref(&frame)) == 1 {
                        sent += 1;
                    } else {
                        std::thread::yield_now();
                    }
                }
            })
        };

        let mut received = 0usize;
        let mut out = [AudioFrame::new(1)];
        while received < COUNT {
            if ring.read(&mut out) == 1 {
                assert_eq!(out[0].samples()[0], received as f32);
                received += 1;
            } else {
                std::thread::yield_now();
            }
        }

        producer.join().unwrap();
        assert!(ring.empty());
    }
}
