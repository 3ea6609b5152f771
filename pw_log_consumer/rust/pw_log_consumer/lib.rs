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

//! Output sinks for `pw_log_core`.
//!
//! - [`SerialConsumer`] writes records to any [`embedded_io::Write`] port.
//! - [`ConsoleConsumer`] writes records to the host's standard output.
//! - [`Base64Consumer`] wraps another consumer and hands it `$`-prefixed
//!   Base64 text instead of the raw record, for transports that only carry
//!   printable characters.
//!
//! ```
//! use pw_log_consumer::{Base64Consumer, SerialConsumer};
//! use pw_log_core::{LogConfig, LogCore, NoopSignal};
//!
//! let mut line = [0u8; 256];
//! let uart = Base64Consumer::new(SerialConsumer::new(&mut line[..]));
//! let mut core: LogCore<'_, NoopSignal> = LogCore::new(LogConfig::synchronous(), NoopSignal);
//! core.register_consumer(&uart).unwrap();
//! pw_log_core::warn!(core, "Log fact: a log is {} rings old", 80);
//! ```

pub mod base64;
pub mod colors;
#[cfg(feature = "std")]
pub mod console;
pub mod serial;

pub use base64::Base64Consumer;
#[cfg(feature = "std")]
pub use console::ConsoleConsumer;
pub use serial::SerialConsumer;

#[cfg(all(test, feature = "std"))]
mod tests;
