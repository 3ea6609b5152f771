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

//! A byte ring buffer carrying variable length log frames.
//!
//! Every frame is a fixed size header followed by the payload:
//!
//! | offset | size | field                      |
//! |--------|------|----------------------------|
//! | 0      | 4    | signature (`0xDEADBEEF`)   |
//! | 4      | 4    | sequence number            |
//! | 8      | 4    | payload length             |
//! | 12     | 1    | level                      |
//!
//! All fields are little endian.  The layout only lives in RAM and is not
//! stable across builds.

use crate::{Error, LogLevel, OverflowPolicy, Result};

/// Marks the start of every frame.
pub const FRAME_SIGNATURE: u32 = 0xDEAD_BEEF;

/// Size of a frame header in bytes.
pub const HEADER_SIZE: usize = 13;

/// Metadata of a frame returned by [`FrameQueue::pull`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame {
    /// Sequence number assigned when the frame was pushed.
    pub sequence: u32,
    /// Level of the record.
    pub level: LogLevel,
    /// Number of payload bytes copied into the caller's buffer.
    pub length: usize,
    /// Number of payload bytes stored in the queue.  Larger than `length`
    /// when the caller's buffer was too small.
    pub recorded_length: usize,
}

impl Frame {
    /// Returns `true` if the payload did not fit the caller's buffer.
    pub const fn is_truncated(&self) -> bool {
        self.length < self.recorded_length
    }
}

struct Header {
    signature: u32,
    sequence: u32,
    length: u32,
    level: u8,
}

impl Header {
    fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.signature.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.sequence.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.length.to_le_bytes());
        bytes[12] = self.level;
        bytes
    }

    fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let word = |offset: usize| {
            u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        Self {
            signature: word(0),
            sequence: word(4),
            length: word(8),
            level: bytes[12],
        }
    }
}

/// A ring buffer of log frames over borrowed storage.
///
/// ## Invariants
///
/// For storage of `capacity` bytes:
///
/// 1. `capacity > HEADER_SIZE + 1`.
/// 2. `0 <= head < capacity` and `0 <= tail < capacity`.
/// 3. `head == tail` means the queue is empty.  At most `capacity - 1` bytes
///    are ever in use so a full queue is never mistaken for an empty one.
/// 4. The bytes from `head` up to (not including) `tail`, walking forward
///    modulo `capacity`, are a sequence of complete frames.
///
/// `FrameQueue` itself is not synchronized.  Callers sharing it between
/// producers and the drain thread keep it behind a lock, as
/// [`LogCore`](crate::LogCore) does.
pub struct FrameQueue<'a> {
    buffer: &'a mut [u8],
    head: usize,
    tail: usize,
    next_sequence: u32,
    overflow: OverflowPolicy,
    overflows: usize,
}

impl<'a> FrameQueue<'a> {
    /// Creates an empty queue using `buffer` as storage.
    ///
    /// Returns `Error::InvalidArgument` if `buffer` cannot hold a header and
    /// at least one payload byte next to the byte that is always kept free.
    pub fn new(buffer: &'a mut [u8], overflow: OverflowPolicy) -> Result<Self> {
        if buffer.len() <= HEADER_SIZE + 1 || buffer.len() > u32::MAX as usize {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            buffer,
            head: 0,
            tail: 0,
            next_sequence: 0,
            overflow,
            overflows: 0,
        })
    }

    /// Size of the backing storage in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes currently holding frames.
    pub fn len(&self) -> usize {
        if self.tail >= self.head {
            self.tail - self.head
        } else {
            self.capacity() - (self.head - self.tail)
        }
    }

    /// Number of bytes a push can use without overflowing.
    pub fn free(&self) -> usize {
        self.capacity() - 1 - self.len()
    }

    /// Returns `true` if no frames are queued.
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Largest payload a single frame can carry.
    pub fn max_payload(&self) -> usize {
        self.capacity() - 1 - HEADER_SIZE
    }

    /// Current `(head, tail)` cursors.
    pub fn cursors(&self) -> (usize, usize) {
        (self.head, self.tail)
    }

    /// Overflow policy applied by [`FrameQueue::push`].
    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Number of pushes that found the queue full, whichever way the overflow
    /// policy resolved it.
    pub fn overflows(&self) -> usize {
        self.overflows
    }

    /// Sequence number the next successful push will be assigned.
    pub fn next_sequence(&self) -> u32 {
        self.next_sequence
    }

    /// Discards every queued frame.
    pub fn clear(&mut self) {
        self.head = self.tail;
    }

    /// Appends `message` as a new frame and returns its sequence number.
    ///
    /// Messages longer than [`FrameQueue::max_payload`] are truncated.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` - `message` is empty.
    /// - `Error::OutOfRange` - the frame could not fit even an empty queue.
    /// - `Error::ResourceExhausted` - the queue is full and the overflow
    ///   policy is [`OverflowPolicy::Reject`].  The queue is left untouched.
    pub fn push(&mut self, message: &[u8], level: LogLevel) -> Result<u32> {
        if message.is_empty() {
            return Err(Error::InvalidArgument);
        }

        let payload_len = message.len().min(self.max_payload());
        let frame_len = HEADER_SIZE + payload_len;
        if frame_len > self.capacity() - 1 {
            return Err(Error::OutOfRange);
        }

        if frame_len > self.free() {
            self.overflows += 1;
            match self.overflow {
                OverflowPolicy::DropOldest => self.clear(),
                OverflowPolicy::Reject => return Err(Error::ResourceExhausted),
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);

        let header = Header {
            signature: FRAME_SIGNATURE,
            sequence,
            // `new` bounds the capacity to `u32::MAX`.
            length: payload_len as u32,
            level: level as u8,
        };
        for byte in header.to_bytes() {
            self.write_byte(byte);
        }
        for &byte in &message[..payload_len] {
            self.write_byte(byte);
        }

        Ok(sequence)
    }

    /// Removes the oldest frame, copying its payload into `out`.
    ///
    /// Returns `Ok(None)` when the queue is empty; an empty queue is never
    /// modified.  A payload longer than `out` is truncated to fit, but the
    /// whole frame is consumed.
    ///
    /// # Errors
    /// - `Error::DataLoss` - the bytes at the read cursor are not a valid
    ///   frame.  The queue can no longer be parsed, so every queued byte is
    ///   discarded and the next push starts a fresh frame stream.
    pub fn pull(&mut self, out: &mut [u8]) -> Result<Option<Frame>> {
        if self.is_empty() {
            return Ok(None);
        }

        let available = self.len();
        if available < HEADER_SIZE {
            self.clear();
            return Err(Error::DataLoss);
        }

        let mut header_bytes = [0u8; HEADER_SIZE];
        let mut cursor = self.head;
        for byte in header_bytes.iter_mut() {
            *byte = self.buffer[cursor];
            cursor = (cursor + 1) % self.capacity();
        }
        let header = Header::from_bytes(&header_bytes);

        let recorded_length = header.length as usize;
        if header.signature != FRAME_SIGNATURE || recorded_length > available - HEADER_SIZE {
            self.clear();
            return Err(Error::DataLoss);
        }
        let Some(level) = LogLevel::from_u8(header.level) else {
            self.clear();
            return Err(Error::DataLoss);
        };

        let length = recorded_length.min(out.len());
        for byte in out[..length].iter_mut() {
            *byte = self.buffer[cursor];
            cursor = (cursor + 1) % self.capacity();
        }

        self.head = (self.head + HEADER_SIZE + recorded_length) % self.capacity();

        Ok(Some(Frame {
            sequence: header.sequence,
            level,
            length,
            recorded_length,
        }))
    }

    fn write_byte(&mut self, byte: u8) {
        self.buffer[self.tail] = byte;
        self.tail = (self.tail + 1) % self.capacity();
    }
}
