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

//! Short level tags for terminal output, colored with the `color` feature.

use pw_log_core::LogLevel;

/// Resets all attributes.
pub const RESET: &str = "\x1b[0m";
/// Dims the following text.
pub const DIM: &str = "\x1b[2m";

macro_rules! colored {
    ($color:literal, $tag:literal) => {
        concat!("\x1b[2m", $color, $tag, "\x1b[0m")
    };
}

/// Three letter tag for `level`.
#[must_use]
pub const fn log_level_tag(level: LogLevel) -> &'static str {
    if cfg!(feature = "color") {
        match level {
            LogLevel::None => "---",
            LogLevel::Debug => colored!("\x1b[37m", "DBG"),
            LogLevel::Info => colored!("\x1b[36m", "INF"),
            LogLevel::Warn => colored!("\x1b[33m", "WRN"),
            LogLevel::Error => colored!("\x1b[31m", "ERR"),
            LogLevel::Critical => colored!("\x1b[1;31m", "CRT"),
        }
    } else {
        match level {
            LogLevel::None => "---",
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WRN",
            LogLevel::Error => "ERR",
            LogLevel::Critical => "CRT",
        }
    }
}
