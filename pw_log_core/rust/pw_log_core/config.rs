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

//! Start-up configuration of a [`LogCore`](crate::LogCore).
//!
//! Sizes that determine stack or static storage are compile-time constants.
//! Everything else is picked once, when the core is constructed, and never
//! changes afterwards.

use crate::LogLevel;

/// Largest formatted record, in bytes.
///
/// This sizes the front end's formatting buffer and the scratch buffer frames
/// are drained into.  Longer records are truncated.
pub const MAX_MESSAGE_LENGTH: usize = 256;

/// Number of consumer slots a [`LogCore`](crate::LogCore) has by default.
pub const DEFAULT_MAX_CONSUMERS: usize = 4;

/// Name given to the background drain thread.
pub const WORKER_THREAD_NAME: &str = "log_thread";

/// How records reach the consumers.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogMode {
    /// The log call returns once every consumer has processed the record.
    Synchronous,
    /// The log call copies the record into the frame queue and returns; the
    /// worker thread delivers it later.
    Deferred,
}

/// What a push does when the frame queue has no room for the new frame.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OverflowPolicy {
    /// Keep what is queued and drop the new record.
    Reject,
    /// Discard everything that is queued and store the new record.
    DropOldest,
}

/// Configuration of a [`LogCore`](crate::LogCore).
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LogConfig {
    /// Delivery mode.
    pub mode: LogMode,
    /// Overflow policy of the frame queue.
    pub overflow: OverflowPolicy,
    /// Number of deferred pushes after which the worker thread is woken.
    /// Values below one behave like one.
    pub flush_threshold: usize,
    /// Records below this level are discarded by the front end.
    pub min_level: LogLevel,
    /// Stack size of the worker thread in bytes.
    pub worker_stack_size: usize,
}

impl LogConfig {
    /// Default configuration: deferred delivery, drop-oldest overflow, wake
    /// the worker on every push, log everything.
    pub const DEFAULT: Self = Self {
        mode: LogMode::Deferred,
        overflow: OverflowPolicy::DropOldest,
        flush_threshold: 1,
        min_level: LogLevel::Debug,
        worker_stack_size: 16 * 1024,
    };

    /// Default configuration with synchronous delivery.
    #[must_use]
    pub const fn synchronous() -> Self {
        Self {
            mode: LogMode::Synchronous,
            ..Self::DEFAULT
        }
    }

    /// Default configuration with deferred delivery and the given overflow
    /// policy and wake threshold.
    #[must_use]
    pub const fn deferred(overflow: OverflowPolicy, flush_threshold: usize) -> Self {
        Self {
            mode: LogMode::Deferred,
            overflow,
            flush_threshold,
            ..Self::DEFAULT
        }
    }

    pub(crate) const fn effective_threshold(&self) -> usize {
        if self.flush_threshold == 0 {
            1
        } else {
            self.flush_threshold
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
