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

//! Synchronization primitives used by the logging pipeline.

#[cfg(feature = "std")]
mod event;
mod spinlock;

#[cfg(feature = "std")]
pub use event::Event;
pub use spinlock::{SpinLock, SpinLockGuard};

/// A binary wake-up signal between log producers and the worker thread.
///
/// Producers call [`WakeSignal::signal`] once enough records are queued; the
/// worker thread blocks in [`WakeSignal::wait`] between drain cycles.
/// Signals raised while nobody waits must not be lost: the next `wait`
/// returns immediately.
pub trait WakeSignal: Sync {
    /// Wakes the waiter.
    ///
    /// # Interrupt context
    ///
    /// Implementations must be safe to call in an interrupt context.
    fn signal(&self);

    /// Blocks until the signal is raised, then clears it.
    fn wait(&self);
}

impl<S: WakeSignal + ?Sized> WakeSignal for &S {
    fn signal(&self) {
        (**self).signal()
    }

    fn wait(&self) {
        (**self).wait()
    }
}

/// A [`WakeSignal`] that never wakes anybody.
///
/// Suitable for synchronous cores and for deferred cores that are drained
/// explicitly with [`LogCore::drain`](crate::LogCore::drain).  `wait` only
/// yields the processor, so a worker thread waiting on it busy-polls.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSignal;

impl WakeSignal for NoopSignal {
    fn signal(&self) {}

    fn wait(&self) {
        #[cfg(feature = "std")]
        std::thread::yield_now();
        #[cfg(not(feature = "std"))]
        core::hint::spin_loop();
    }
}
