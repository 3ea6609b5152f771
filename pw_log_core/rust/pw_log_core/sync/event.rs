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

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::{Error, Result, WakeSignal};

/// An auto-resetting binary event for hosted targets.
///
/// When an `Event` is signaled, the first waiter to observe that signal
/// automatically clears the signaled state, returning the `Event` to the
/// un-signaled state.  Signaling an already signaled `Event` has no further
/// effect.
pub struct Event {
    signaled: Mutex<bool>,
    condvar: Condvar,
}

impl Event {
    /// Constructs a new, un-signaled `Event`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            signaled: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Sets the `Event`'s state to signaled and wakes one waiter.
    pub fn signal(&self) {
        let mut signaled = self.state();
        if !*signaled {
            *signaled = true;
            self.condvar.notify_one();
        }
    }

    /// Waits until the `Event` is in the signaled state, then clears it.
    pub fn wait(&self) {
        let mut signaled = self.state();
        while !*signaled {
            signaled = self
                .condvar
                .wait(signaled)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *signaled = false;
    }

    /// Waits until the `Event` is in the signaled state or `timeout` elapses,
    /// whichever happens first.
    ///
    /// Returns `Error::DeadlineExceeded` if the timeout elapsed first.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<()> {
        let signaled = self.state();
        let (mut signaled, _) = self
            .condvar
            .wait_timeout_while(signaled, timeout, |signaled| !*signaled)
            .unwrap_or_else(PoisonError::into_inner);
        if !*signaled {
            return Err(Error::DeadlineExceeded);
        }
        *signaled = false;
        Ok(())
    }

    /// Returns `true` if the `Event` is signaled and nobody consumed it yet.
    pub fn is_signaled(&self) -> bool {
        *self.state()
    }

    // A panicking holder only ever leaves a valid `bool` behind.
    fn state(&self) -> MutexGuard<'_, bool> {
        self.signaled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeSignal for Event {
    fn signal(&self) {
        Event::signal(self)
    }

    fn wait(&self) {
        Event::wait(self)
    }
}
