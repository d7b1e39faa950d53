//! Streaming seam tests: ring-buffer contract and the queued processing
//! path, including one producer and one consumer on separate threads.

mod helpers;

use helpers::{empty_frames, frames_from_mono, generate_sine, test_engine, TEST_BUFFER_SIZE, TEST_SAMPLE_RATE};
use retune::prelude::*;
use retune::FrameRingBuffer;
use std::sync::Arc;

#[test]
fn test_ring_accounting_invariant() {
    let ring = FrameRingBuffer::new(32, 2);
    let frames = frames_from_mono(&generate_sine(440.0, TEST_SAMPLE_RATE, 20), 2);

    assert_eq!(ring.write(&frames), 20);
    let mut out = empty_frames(8, 2);
    assert_eq!(ring.read(&mut out), 8);

    // available() = writes - reads
    assert_eq!(ring.available(), 12);
    assert_eq!(ring.space(), 32 - 12 - 1);
    assert!(!ring.empty());
    assert!(!ring.full());
}

#[test]
fn test_ring_overflow_scenario() {
    let ring = FrameRingBuffer::new(5, 1);
    let frames = frames_from_mono(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 1);

    let written = ring.write(&frames);
    assert!(written <= 5);
    assert!(ring.full());

    // The frames that made it in come back in order
    let mut out = empty_frames(written, 1);
    assert_eq!(ring.read(&mut out), written);
    for (i, frame) in out.iter().enumerate() {
        assert_eq!(frame.samples()[0], frames[i].samples()[0]);
    }
}

#[test]
fn test_engine_streaming_roundtrip_in_bypass() {
    let mut engine = test_engine();
    engine.set_mode(Mode::Bypass);

    let sine = generate_sine(440.0, TEST_SAMPLE_RATE, TEST_BUFFER_SIZE);
    let input = frames_from_mono(&sine, 2);

    assert_eq!(engine.enqueue_input(&input), TEST_BUFFER_SIZE);
    let result = engine.process_queued();
    assert!(result.success);

    let mut output = empty_frames(TEST_BUFFER_SIZE, 2);
    assert_eq!(engine.dequeue_output(&mut output), TEST_BUFFER_SIZE);
    assert_eq!(input, output);
}

#[test]
fn test_process_queued_with_empty_ring_is_noop() {
    let mut engine = test_engine();
    let result = engine.process_queued();
    assert!(result.success);
    assert_eq!(result.detected_pitch, 0.0);

    let mut output = empty_frames(TEST_BUFFER_SIZE, 2);
    assert_eq!(engine.dequeue_output(&mut output), 0);
}

#[test]
fn test_queued_blocks_drain_one_per_call() {
    let mut engine = test_engine();
    engine.set_mode(Mode::Bypass);

    // Two blocks' worth of frames fit in the 4-block ring
    let sine = generate_sine(440.0, TEST_SAMPLE_RATE, 2 * TEST_BUFFER_SIZE);
    let input = frames_from_mono(&sine, 2);
    assert_eq!(engine.enqueue_input(&input), 2 * TEST_BUFFER_SIZE);

    assert!(engine.process_queued().success);
    let mut output = empty_frames(2 * TEST_BUFFER_SIZE, 2);
    assert_eq!(engine.dequeue_output(&mut output), TEST_BUFFER_SIZE);

    assert!(engine.process_queued().success);
    assert_eq!(engine.dequeue_output(&mut output), TEST_BUFFER_SIZE);
}

#[test]
fn test_spsc_transfer_across_threads() {
    const FRAMES: usize = 20_000;
    let ring = Arc::new(FrameRingBuffer::new(256, 1));

    let producer = {
        let ring = Arc::clone(&ring);
        std::thread::spawn(move || {
            let mut sent = 0usize;
            while sent < FRAMES {
                let frame = AudioFrame::from_samples(vec![sent as f32]);
                if ring.write(std::slice::from_ref(&frame)) == 1 {
                    sent += 1;
                } else {
                    std::thread::yield_now();
                }
            }
        })
    };

    let mut received = 0usize;
    let mut out = [AudioFrame::new(1)];
    while received < FRAMES {
        if ring.read(&mut out) == 1 {
            assert_eq!(
                out[0].samples()[0],
                received as f32,
                "frames must arrive in order"
            );
            received += 1;
        } else {
            std::thread::yield_now();
        }
    }

    producer.join().unwrap();
    assert!(ring.empty());
}
