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
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

//! `pw_log_core` is the delivery engine behind a leveled logging API for
//! embedded devices.
//!
//! Already formatted log records are handed to a [`LogCore`], which either
//! fans them out to every registered [`LogConsumer`] right away
//! ([`LogMode::Synchronous`]) or copies them into a framed ring buffer that a
//! background worker thread drains ([`LogMode::Deferred`]).  When the system
//! is about to stop, [`LogCore::enable_panic_mode`] flushes everything that is
//! still queued before returning.
//!
//! Without the `std` feature the crate needs a [`critical_section`]
//! implementation that masks interrupts (for example `cortex-m`'s
//! `critical-section-single-core`), which makes logging from interrupt
//! handlers safe, and a `pw_log_core_halt` symbol for failed assertions.
//!
//! ```
//! use pw_log_core::{LogConfig, LogConsumer, LogCore, LogLevel, NoopSignal, Result};
//!
//! struct Stdout;
//!
//! impl LogConsumer for Stdout {
//!     fn process_message(&self, message: &[u8], _level: LogLevel) -> Result<()> {
//!         print!("{}", core::str::from_utf8(message).unwrap_or("<binary>"));
//!         Ok(())
//!     }
//! }
//!
//! let stdout = Stdout;
//! let mut core: LogCore<'_, NoopSignal> = LogCore::new(LogConfig::synchronous(), NoopSignal);
//! core.register_consumer(&stdout).unwrap();
//!
//! pw_log_core::info!(&core, "Log fact: logs float, the answer is {}", 42);
//! ```

mod level;

pub mod config;
pub mod consumer;
pub mod dispatch;
pub mod frontend;
pub mod queue;
pub mod status;
pub mod sync;
#[cfg(feature = "std")]
pub mod thread;

pub use config::{LogConfig, LogMode, OverflowPolicy, DEFAULT_MAX_CONSUMERS, MAX_MESSAGE_LENGTH};
pub use consumer::{ConsumerId, ConsumerRegistry, DispatchReport, LogConsumer};
pub use dispatch::{LogCore, LogStats};
pub use level::LogLevel;
pub use queue::{Frame, FrameQueue, HEADER_SIZE};
pub use status::{Error, Result, StatusCode};
#[cfg(feature = "std")]
pub use sync::Event;
pub use sync::{NoopSignal, SpinLock, WakeSignal};
#[cfg(feature = "std")]
pub use thread::LogThread;

#[cfg(all(test, feature = "std"))]
mod tests;

// Re-export dependencies of the logging macros to be accessed via
// `$crate::__private`.
#[doc(hidden)]
pub mod __private {
    pub use crate::LogLevel;
}
