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

//! Error codes reported by the logging pipeline.
//!
//! The discriminants are the canonical
//! [Pigweed status codes](https://pigweed.dev/pw_status/#status-codes) so a
//! failure can be handed to C code or a wire protocol as a plain `u32`.  Only
//! the codes the pipeline can actually produce are listed.
//!
//! ```
//! use pw_log_core::{Error, FrameQueue, OverflowPolicy, StatusCode};
//!
//! let mut storage = [0u8; 8];
//! let result = FrameQueue::new(&mut storage, OverflowPolicy::Reject).map(|_| ());
//! assert_eq!(result, Err(Error::InvalidArgument));
//! assert_eq!(result.status_code(), 3);
//! ```

/// Status code for no error.
pub const OK: u32 = 0;

/// Failure of a logging pipeline operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A consumer failed for a reason it could not describe further.
    Unknown = 2,
    /// The caller passed an empty message or undersized queue storage.
    InvalidArgument = 3,
    /// A bounded wait for the wake signal expired.
    DeadlineExceeded = 4,
    /// No room left: the queue is full under [`OverflowPolicy::Reject`] or
    /// every consumer slot is taken.
    ///
    /// [`OverflowPolicy::Reject`]: crate::OverflowPolicy::Reject
    ResourceExhausted = 8,
    /// The worker was started without deferred mode and queue storage, or a
    /// global logger is already installed.
    FailedPrecondition = 9,
    /// A frame can never fit, even in an empty queue.
    OutOfRange = 11,
    /// The worker thread could not be started or an output port failed.
    Unavailable = 14,
    /// A queued frame failed validation.
    DataLoss = 15,
}

/// Result type used throughout the logging pipeline.
pub type Result<T> = core::result::Result<T, Error>;

/// Convert a Result into a status code.
pub trait StatusCode {
    /// Return a pigweed compatible status code.
    fn status_code(self) -> u32;
}

impl<T> StatusCode for Result<T> {
    fn status_code(self) -> u32 {
        match self {
            Ok(_) => OK,
            Err(e) => e as u32,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Error::Unknown => "UNKNOWN",
            Error::InvalidArgument => "INVALID_ARGUMENT",
            Error::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Error::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Error::FailedPrecondition => "FAILED_PRECONDITION",
            Error::OutOfRange => "OUT_OF_RANGE",
            Error::Unavailable => "UNAVAILABLE",
            Error::DataLoss => "DATA_LOSS",
        };
        f.write_str(name)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
