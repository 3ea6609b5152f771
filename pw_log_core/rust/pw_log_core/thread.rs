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

//! The background thread deferred records are delivered from.

use std::thread::{self, JoinHandle, Thread};

use crate::config::WORKER_THREAD_NAME;
use crate::{Error, LogConfig, Result};

/// Handle to a running log worker thread.
///
/// The thread runs its entry function in a loop for the rest of the process
/// and is never joined.  Dropping the handle detaches it.
pub struct LogThread {
    handle: JoinHandle<()>,
}

impl LogThread {
    /// Spawns a thread named [`WORKER_THREAD_NAME`] with the configured stack
    /// size that calls `entry` forever, yielding between calls.
    ///
    /// `entry` is expected to block until there is work, normally through
    /// [`LogCore::run_worker_cycle`](crate::LogCore::run_worker_cycle).
    ///
    /// # Errors
    /// - `Error::Unavailable` - the operating system refused to create the
    ///   thread.
    pub fn spawn<F>(config: &LogConfig, mut entry: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .stack_size(config.worker_stack_size)
            .spawn(move || {
                loop {
                    entry();
                    thread::yield_now();
                }
            })
            .map_err(|_| Error::Unavailable)?;
        Ok(Self { handle })
    }

    /// The underlying thread.
    pub fn thread(&self) -> &Thread {
        self.handle.thread()
    }

    /// Returns `true` if the thread has exited, which only happens if its
    /// entry function panicked.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
