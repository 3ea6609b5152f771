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

//! The producer-facing side of the pipeline: leveled logging macros, the
//! [`log`] crate facade and the assertion handler.
//!
//! Every record is formatted on the caller's stack as
//!
//! ```text
//! <LEVEL> <module>|<file>:<line> - <message>
//! ```
//!
//! followed by a newline, and then handed to [`LogCore::handle_message`].
//! Records longer than [`MAX_MESSAGE_LENGTH`] are truncated; the trailing
//! newline is always kept.

use core::fmt::{self, Write as _};

use crate::{Error, LogCore, LogLevel, MAX_MESSAGE_LENGTH, Result, WakeSignal};

/// Strips the directory part of a `file!()` path.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

struct MessageBuffer {
    bytes: [u8; MAX_MESSAGE_LENGTH],
    len: usize,
}

impl MessageBuffer {
    const fn new() -> Self {
        Self {
            bytes: [0; MAX_MESSAGE_LENGTH],
            len: 0,
        }
    }

    fn finish(&mut self) -> &[u8] {
        self.bytes[self.len] = b'\n';
        self.len += 1;
        &self.bytes[..self.len]
    }
}

impl fmt::Write for MessageBuffer {
    // Truncates silently.  One byte is held back for the newline.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = MAX_MESSAGE_LENGTH - 1 - self.len;
        let count = s.len().min(room);
        self.bytes[self.len..self.len + count].copy_from_slice(&s.as_bytes()[..count]);
        self.len += count;
        Ok(())
    }
}

impl<S: WakeSignal, const N: usize> LogCore<'_, S, N> {
    /// Returns `true` if records at `level` pass this core's minimum level.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && level >= self.config().min_level
    }

    /// Formats one record and hands it to [`LogCore::handle_message`].
    ///
    /// This is what the logging macros expand to.  Records filtered out by
    /// [`LogCore::is_enabled`] are not formatted.
    pub fn log_fmt(
        &self,
        level: LogLevel,
        module: &str,
        file: &str,
        line: u32,
        args: fmt::Arguments<'_>,
    ) {
        if self.is_enabled(level) {
            self.emit(level, module, file, line, args);
        }
    }

    /// Enables panic mode, flushing every queued record, then delivers a
    /// `CRITICAL` assertion record synchronously.
    ///
    /// The record is emitted regardless of the minimum level, and never
    /// competes with the backlog for queue space.
    pub fn report_assertion(&self, file: &str, line: u32) {
        self.enable_panic_mode();
        let file = file_name(file);
        self.emit(
            LogLevel::Critical,
            module_path!(),
            file,
            line,
            format_args!("ASSERTION at {file}:{line}"),
        );
    }

    /// Assertion failure handler: reports the failure, then halts.
    ///
    /// Hosted builds abort the process.  Bare-metal builds call the
    /// `pw_log_core_halt` symbol, which the application must provide.
    pub fn handle_assert(&self, file: &str, line: u32) -> ! {
        self.report_assertion(file, line);
        halt()
    }

    fn emit(&self, level: LogLevel, module: &str, file: &str, line: u32, args: fmt::Arguments<'_>) {
        let mut buffer = MessageBuffer::new();
        // A failing `Display` impl leaves a partial record, which is still
        // worth delivering.
        let _ = write!(
            buffer,
            "{} {}|{}:{} - {}",
            level.as_str(),
            module,
            file_name(file),
            line,
            args
        );
        self.handle_message(buffer.finish(), level);
    }
}

#[cfg(feature = "std")]
fn halt() -> ! {
    std::process::abort()
}

#[cfg(not(feature = "std"))]
fn halt() -> ! {
    unsafe extern "Rust" {
        fn pw_log_core_halt() -> !;
    }
    // SAFETY: The application provides `pw_log_core_halt` with this
    // signature.
    unsafe { pw_log_core_halt() }
}

impl<S: WakeSignal + Send, const N: usize> log::Log for LogCore<'_, S, N> {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.is_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        self.log_fmt(
            record.level().into(),
            record.target(),
            record.file().unwrap_or("<unknown>"),
            record.line().unwrap_or(0),
            *record.args(),
        );
    }

    fn flush(&self) {
        self.drain();
    }
}

/// Maps a minimum level onto the `log` crate's filter.
pub fn level_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::None => log::LevelFilter::Off,
        LogLevel::Debug => log::LevelFilter::Trace,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Error | LogLevel::Critical => log::LevelFilter::Error,
    }
}

/// Installs `core` as the global [`log`] logger.
///
/// # Errors
/// - `Error::FailedPrecondition` - a global logger is already installed.
pub fn set_logger<S, const N: usize>(core: &'static LogCore<'static, S, N>) -> Result<()>
where
    S: WakeSignal + Send + 'static,
{
    log::set_logger(core).map_err(|_| Error::FailedPrecondition)?;
    log::set_max_level(level_filter(core.config().min_level));
    Ok(())
}

/// Emits a record at an explicit level.
///
/// ```
/// use pw_log_core::{LogConfig, LogCore, LogLevel, NoopSignal};
///
/// let core: LogCore<'_, NoopSignal> = LogCore::new(LogConfig::synchronous(), NoopSignal);
/// pw_log_core::log!(core, LogLevel::Warn, "Log fact: a {} log rolls", "round");
/// ```
#[macro_export]
macro_rules! log {
    ($core:expr, $level:expr, $($args:tt)+) => {{
        let __pw_log_core = &$core;
        __pw_log_core.log_fmt(
            $level,
            ::core::module_path!(),
            ::core::file!(),
            ::core::line!(),
            ::core::format_args!($($args)+),
        )
    }};
}

/// Emits a debug level record.
#[macro_export]
macro_rules! debug {
    ($core:expr, $($args:tt)+) => {
        $crate::log!($core, $crate::__private::LogLevel::Debug, $($args)+)
    };
}

/// Emits an info level record.
#[macro_export]
macro_rules! info {
    ($core:expr, $($args:tt)+) => {
        $crate::log!($core, $crate::__private::LogLevel::Info, $($args)+)
    };
}

/// Emits a warn level record.
#[macro_export]
macro_rules! warn {
    ($core:expr, $($args:tt)+) => {
        $crate::log!($core, $crate::__private::LogLevel::Warn, $($args)+)
    };
}

/// Emits an error level record.
#[macro_export]
macro_rules! error {
    ($core:expr, $($args:tt)+) => {
        $crate::log!($core, $crate::__private::LogLevel::Error, $($args)+)
    };
}

/// Emits a critical level record.
///
/// *Note*: `critical!` only emits a record.  Use [`log_assert!`] to stop the
/// system.
#[macro_export]
macro_rules! critical {
    ($core:expr, $($args:tt)+) => {
        $crate::log!($core, $crate::__private::LogLevel::Critical, $($args)+)
    };
}

/// Checks a condition and, if it does not hold, reports the failure through
/// `core`, flushes everything queued and halts.
///
/// An optional format string and arguments are logged at critical level
/// before the assertion record.
#[macro_export]
macro_rules! log_assert {
    ($core:expr, $condition:expr $(,)?) => {{
        if !$condition {
            $core.handle_assert(::core::file!(), ::core::line!())
        }
    }};

    ($core:expr, $condition:expr, $($args:tt)+) => {{
        if !$condition {
            let __pw_log_core = &$core;
            $crate::critical!(__pw_log_core, $($args)+);
            __pw_log_core.handle_assert(::core::file!(), ::core::line!())
        }
    }};
}
