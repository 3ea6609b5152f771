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

//! A consumer for byte-oriented ports such as UARTs.

use embedded_io::Write;
use pw_log_core::{Error, LogConsumer, LogLevel, Result, SpinLock};

use crate::colors::log_level_tag;

/// Writes every record to an [`embedded_io::Write`] port.
///
/// The port is kept behind a [`SpinLock`] so records from the worker thread
/// and from a panic-mode flush never interleave.
pub struct SerialConsumer<W> {
    port: SpinLock<W>,
    level_tags: bool,
}

impl<W: Write + Send> SerialConsumer<W> {
    /// Wraps `port`.  Records are written as they are.
    pub const fn new(port: W) -> Self {
        Self {
            port: SpinLock::new(port),
            level_tags: false,
        }
    }

    /// Wraps `port` and prefixes every record with its
    /// [level tag](crate::colors::log_level_tag) and a space.
    pub const fn with_level_tags(port: W) -> Self {
        Self {
            port: SpinLock::new(port),
            level_tags: true,
        }
    }

    /// Runs `f` with exclusive access to the port.
    pub fn with_port<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.port.lock())
    }
}

impl<W: Write + Send> LogConsumer for SerialConsumer<W> {
    fn process_message(&self, message: &[u8], level: LogLevel) -> Result<()> {
        let mut port = self.port.lock();
        if self.level_tags {
            port.write_all(log_level_tag(level).as_bytes())
                .map_err(|_| Error::Unavailable)?;
            port.write_all(b" ").map_err(|_| Error::Unavailable)?;
        }
        port.write_all(message).map_err(|_| Error::Unavailable)?;
        port.flush().map_err(|_| Error::Unavailable)
    }
}
