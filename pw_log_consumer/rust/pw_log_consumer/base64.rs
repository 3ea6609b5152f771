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

//! Prefixed Base64 framing of log records.
//!
//! Binary (for example tokenized) records are sent over text transports as
//! a `$` followed by the standard, padded Base64 encoding of the record, so
//! host tools can find and decode them in a mixed stream.
//!
//! ```
//! use pw_log_consumer::base64::{encode_prefixed, prefixed_encoded_size};
//!
//! let mut output = [0u8; prefixed_encoded_size(3)];
//! let len = encode_prefixed(b"\x01\x02\x03", &mut output).unwrap();
//! assert_eq!(&output[..len], b"$AQID");
//! ```

use pw_log_core::{Error, LogConsumer, LogLevel, MAX_MESSAGE_LENGTH, Result};

/// Marks the start of a Base64 encoded record.
pub const PREFIX: u8 = b'$';

macro_rules! b {
    ($char:tt) => {
        stringify!($char).as_bytes()[0]
    };
}

// Every entry is a single-byte ASCII character, which the `b!` macro relies
// on.
#[rustfmt::skip]
const ENCODE_TABLE: [u8; 64] = [
    b!(A), b!(B), b!(C), b!(D), b!(E), b!(F), b!(G), b!(H),
    b!(I), b!(J), b!(K), b!(L), b!(M), b!(N), b!(O), b!(P),
    b!(Q), b!(R), b!(S), b!(T), b!(U), b!(V), b!(W), b!(X),
    b!(Y), b!(Z), b!(a), b!(b), b!(c), b!(d), b!(e), b!(f),
    b!(g), b!(h), b!(i), b!(j), b!(k), b!(l), b!(m), b!(n),
    b!(o), b!(p), b!(q), b!(r), b!(s), b!(t), b!(u), b!(v),
    b!(w), b!(x), b!(y), b!(z), b!(0), b!(1), b!(2), b!(3),
    b!(4), b!(5), b!(6), b!(7), b!(8), b!(9), b!(+), b!(/),
];
const PADDING: u8 = b!(=);

/// Size of the Base64 encoding of `input_size` bytes.
pub const fn encoded_size(input_size: usize) -> usize {
    input_size.div_ceil(3) * 4
}

/// Size of the prefixed Base64 encoding of `input_size` bytes.
pub const fn prefixed_encoded_size(input_size: usize) -> usize {
    1 + encoded_size(input_size)
}

const fn sextet(group: u32, index: u32) -> u8 {
    ENCODE_TABLE[((group >> (18 - 6 * index)) & 0x3f) as usize]
}

/// Encodes `input` as Base64 into `output`.
///
/// Returns the number of bytes written or `Error::OutOfRange` if `output` is
/// shorter than [`encoded_size`].
pub fn encode(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let size = encoded_size(input.len());
    if output.len() < size {
        return Err(Error::OutOfRange);
    }

    for (chunk, quad) in input.chunks(3).zip(output.chunks_exact_mut(4)) {
        let group = chunk
            .iter()
            .enumerate()
            .fold(0u32, |group, (i, &byte)| group | (u32::from(byte) << (16 - 8 * i)));
        quad[0] = sextet(group, 0);
        quad[1] = sextet(group, 1);
        quad[2] = if chunk.len() > 1 { sextet(group, 2) } else { PADDING };
        quad[3] = if chunk.len() > 2 { sextet(group, 3) } else { PADDING };
    }

    Ok(size)
}

/// Encodes `input` as `$`-prefixed Base64 into `output`.
///
/// Returns the number of bytes written or `Error::OutOfRange` if `output` is
/// shorter than [`prefixed_encoded_size`].
pub fn encode_prefixed(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let Some((prefix, rest)) = output.split_first_mut() else {
        return Err(Error::OutOfRange);
    };
    *prefix = PREFIX;
    Ok(1 + encode(input, rest)?)
}

// Room for the largest record plus a line terminator.
const ENCODED_CAPACITY: usize = prefixed_encoded_size(MAX_MESSAGE_LENGTH) + 1;

/// Hands the wrapped consumer the prefixed Base64 encoding of each record,
/// terminated by a newline.
///
/// Records whose encoding would not fit the stack buffer (only possible for
/// records longer than [`MAX_MESSAGE_LENGTH`]) are passed through raw.
pub struct Base64Consumer<C> {
    inner: C,
}

impl<C: LogConsumer> Base64Consumer<C> {
    /// Wraps `inner`.
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped consumer.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: LogConsumer> LogConsumer for Base64Consumer<C> {
    fn initialize(&self) -> Result<()> {
        self.inner.initialize()
    }

    fn process_message(&self, message: &[u8], level: LogLevel) -> Result<()> {
        let mut encoded = [0u8; ENCODED_CAPACITY];
        match encode_prefixed(message, &mut encoded[..ENCODED_CAPACITY - 1]) {
            Ok(len) => {
                encoded[len] = b'\n';
                self.inner.process_message(&encoded[..=len], level)
            }
            Err(_) => self.inner.process_message(message, level),
        }
    }
}
