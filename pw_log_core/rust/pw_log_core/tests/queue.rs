// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.
use crate::queue::testing::storage_mut;
use crate::{Error, Frame, FrameQueue, HEADER_SIZE, LogLevel, OverflowPolicy};

const TEN_BYTES: &[u8] = b"0123456789";

#[test]
fn storage_must_fit_a_header_and_a_payload_byte() {
    let mut tiny = [0u8; HEADER_SIZE + 1];
    assert!(matches!(
        FrameQueue::new(&mut tiny, OverflowPolicy::Reject),
        Err(Error::InvalidArgument)
    ));

    let mut smallest = [0u8; HEADER_SIZE + 2];
    let mut queue = FrameQueue::new(&mut smallest, OverflowPolicy::Reject).unwrap();
    assert_eq!(queue.max_payload(), 1);
    assert_eq!(queue.push(b"x", LogLevel::Info), Ok(0));
    assert_eq!(queue.free(), 0);
}

#[test]
fn pushed_frame_pulls_back_unchanged() {
    let mut storage = [0u8; 64];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::DropOldest).unwrap();

    assert_eq!(queue.push(b"hello", LogLevel::Warn), Ok(0));
    assert_eq!(queue.len(), HEADER_SIZE + 5);

    let mut out = [0u8; 32];
    let frame = queue.pull(&mut out).unwrap().unwrap();
    assert_eq!(
        frame,
        Frame {
            sequence: 0,
            level: LogLevel::Warn,
            length: 5,
            recorded_length: 5,
        }
    );
    assert_eq!(&out[..frame.length], b"hello");
    assert!(queue.is_empty());
}

#[test]
fn empty_message_is_rejected() {
    let mut storage = [0u8; 64];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::DropOldest).unwrap();
    assert_eq!(queue.push(b"", LogLevel::Info), Err(Error::InvalidArgument));
    assert_eq!(queue.next_sequence(), 0);
    assert!(queue.is_empty());
}

#[test]
fn pull_on_empty_queue_changes_nothing() {
    let mut storage = [0u8; 64];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::DropOldest).unwrap();
    queue.push(TEN_BYTES, LogLevel::Info).unwrap();
    let mut out = [0u8; 32];
    queue.pull(&mut out).unwrap();

    let cursors = queue.cursors();
    for _ in 0..3 {
        assert_eq!(queue.pull(&mut out), Ok(None));
        assert_eq!(queue.cursors(), cursors);
    }
}

#[test]
fn frame_spanning_the_end_of_storage_is_reassembled() {
    let mut storage = [0u8; 40];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::Reject).unwrap();
    let mut out = [0u8; 32];

    queue.push(b"aaaaaaaaaa", LogLevel::Info).unwrap();
    queue.pull(&mut out).unwrap();
    assert_eq!(queue.cursors(), (23, 23));

    assert_eq!(queue.push(b"bbbbbbbbbb", LogLevel::Error), Ok(1));
    assert_eq!(queue.cursors(), (23, 6));
    assert_eq!(queue.len(), 23);

    let frame = queue.pull(&mut out).unwrap().unwrap();
    assert_eq!(frame.sequence, 1);
    assert_eq!(frame.level, LogLevel::Error);
    assert_eq!(&out[..frame.length], b"bbbbbbbbbb");
    assert_eq!(queue.cursors(), (6, 6));
}

#[test]
fn reject_policy_leaves_queue_untouched_when_full() {
    let mut storage = [0u8; 40];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::Reject).unwrap();

    assert_eq!(queue.push(b"first.....", LogLevel::Info), Ok(0));
    let cursors = queue.cursors();
    assert_eq!(
        queue.push(b"second....", LogLevel::Info),
        Err(Error::ResourceExhausted)
    );
    assert_eq!(queue.cursors(), cursors);
    assert_eq!(queue.next_sequence(), 1);
    assert_eq!(queue.overflows(), 1);

    let mut out = [0u8; 32];
    let frame = queue.pull(&mut out).unwrap().unwrap();
    assert_eq!(frame.sequence, 0);
    assert_eq!(&out[..frame.length], b"first.....");
    assert_eq!(queue.pull(&mut out), Ok(None));
}

#[test]
fn drop_oldest_policy_discards_backlog_and_leaves_sequence_gap() {
    let mut storage = [0u8; 64];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::DropOldest).unwrap();
    let mut out = [0u8; 32];

    assert_eq!(queue.push(TEN_BYTES, LogLevel::Info), Ok(0));
    let frame = queue.pull(&mut out).unwrap().unwrap();
    assert_eq!(frame.sequence, 0);
    assert_eq!(frame.length, 10);
    assert_eq!(frame.level, LogLevel::Info);

    for expected in 1..=5 {
        assert_eq!(queue.push(TEN_BYTES, LogLevel::Info), Ok(expected));
    }
    assert_eq!(queue.overflows(), 2);

    let mut drained = Vec::new();
    while let Some(frame) = queue.pull(&mut out).unwrap() {
        drained.push(frame.sequence);
    }
    assert_eq!(drained, [5]);
}

#[test]
fn oversized_message_is_truncated_to_fit() {
    let mut storage = [0u8; 40];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::Reject).unwrap();
    let message = [b'z'; 30];

    assert_eq!(queue.push(&message, LogLevel::Debug), Ok(0));
    assert_eq!(queue.free(), 0);

    let mut out = [0u8; 64];
    let frame = queue.pull(&mut out).unwrap().unwrap();
    assert_eq!(frame.length, 40 - 1 - HEADER_SIZE);
    assert!(out[..frame.length].iter().all(|&byte| byte == b'z'));
}

#[test]
fn small_output_buffer_truncates_but_consumes_whole_frame() {
    let mut storage = [0u8; 64];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::Reject).unwrap();
    queue.push(TEN_BYTES, LogLevel::Info).unwrap();
    queue.push(b"next", LogLevel::Info).unwrap();

    let mut short = [0u8; 4];
    let frame = queue.pull(&mut short).unwrap().unwrap();
    assert!(frame.is_truncated());
    assert_eq!(frame.recorded_length, 10);
    assert_eq!(&short, b"0123");

    let frame = queue.pull(&mut short).unwrap().unwrap();
    assert!(!frame.is_truncated());
    assert_eq!(frame.sequence, 1);
    assert_eq!(&short[..frame.length], b"next");
}

#[test]
fn bad_signature_is_reported_and_queue_resyncs() {
    let mut storage = [0u8; 64];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::Reject).unwrap();
    queue.push(b"hello", LogLevel::Info).unwrap();
    queue.push(b"world", LogLevel::Info).unwrap();
    storage_mut(&mut queue)[0] ^= 0xff;

    let mut out = [0u8; 32];
    assert_eq!(queue.pull(&mut out), Err(Error::DataLoss));
    assert!(queue.is_empty());

    assert_eq!(queue.push(b"again", LogLevel::Info), Ok(2));
    let frame = queue.pull(&mut out).unwrap().unwrap();
    assert_eq!(&out[..frame.length], b"again");
}

#[test]
fn impossible_length_is_reported_as_data_loss() {
    let mut storage = [0u8; 64];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::Reject).unwrap();
    queue.push(b"hello", LogLevel::Info).unwrap();
    storage_mut(&mut queue)[8..12].copy_from_slice(&100u32.to_le_bytes());

    let mut out = [0u8; 32];
    assert_eq!(queue.pull(&mut out), Err(Error::DataLoss));
    assert_eq!(queue.pull(&mut out), Ok(None));
}

#[test]
fn unknown_level_byte_is_reported_as_data_loss() {
    let mut storage = [0u8; 64];
    let mut queue = FrameQueue::new(&mut storage, OverflowPolicy::Reject).unwrap();
    queue.push(b"hello", LogLevel::Info).unwrap();
    storage_mut(&mut queue)[12] = 0x7f;

    let mut out = [0u8; 32];
    assert_eq!(queue.pull(&mut out), Err(Error::DataLoss));
    assert!(queue.is_empty());
}
