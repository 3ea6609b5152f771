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

//! Host standard-output log consumer.

use std::io::Write;

use pw_log_core::{Error, LogConsumer, LogLevel, Result};

use crate::colors::log_level_tag;

/// Writes every record to the process's standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleConsumer {
    level_tags: bool,
}

impl ConsoleConsumer {
    /// Writes records as they are.
    #[must_use]
    pub const fn new() -> Self {
        Self { level_tags: false }
    }

    /// Prefixes every record with its level tag.
    #[must_use]
    pub const fn with_level_tags() -> Self {
        Self { level_tags: true }
    }
}

impl LogConsumer for ConsoleConsumer {
    fn process_message(&self, message: &[u8], level: LogLevel) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        if self.level_tags {
            write!(stdout, "{} ", log_level_tag(level)).map_err(|_| Error::Unavailable)?;
        }
        stdout.write_all(message).map_err(|_| Error::Unavailable)?;
        stdout.flush().map_err(|_| Error::Unavailable)
    }
}
