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

use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::RestoreState;

/// Exclusive access to the data of a locked [`SpinLock`].
///
/// The lock is released, and the critical section entered by the lock call
/// is exited, when the guard is dropped.  Guards taken on one thread must be
/// dropped in the reverse order they were acquired.
pub struct SpinLockGuard<'lock, T> {
    lock: &'lock SpinLock<T>,
    restore_state: RestoreState,
    // The critical section belongs to the acquiring context.
    _not_send: PhantomData<*const ()>,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: The guard exists only while `locked` is held, so no other
        // reference to `data` is live.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: See `deref`.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.unlock();
        // SAFETY: `restore_state` came from the `acquire` in `try_lock`, and
        // guards are dropped in reverse acquisition order.
        unsafe { critical_section::release(self.restore_state) };
    }
}

/// A busy-waiting lock for short critical sections.
///
/// The lock is held inside a [`critical_section`]: on bare-metal targets
/// the application's implementation masks interrupts, so an interrupt
/// handler that logs can never spin on a lock held by the code it
/// preempted.  Hosted builds use the `critical-section` `std`
/// implementation, a process-wide reentrant mutex.
pub struct SpinLock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// As long as the inner type is `Send` the lock can be shared between threads.
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Creates an unlocked lock protecting `initial_value`.
    pub const fn new(initial_value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(initial_value),
        }
    }

    /// Acquires the lock if it is free.
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        // SAFETY: Released exactly once, either below or by the guard.
        let restore_state = unsafe { critical_section::acquire() };
        match self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
        {
            Ok(_) => Some(SpinLockGuard {
                lock: self,
                restore_state,
                _not_send: PhantomData,
            }),
            Err(_) => {
                // SAFETY: Pairs with the `acquire` above.
                unsafe { critical_section::release(restore_state) };
                None
            }
        }
    }

    /// Spins until the lock is acquired.
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        loop {
            if let Some(guard) = self.try_lock() {
                return guard;
            }
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }

    /// Returns mutable access to the data without locking.
    ///
    /// Exclusive access is guaranteed statically by `&mut self`.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    // Only to be called by SpinLockGuard::drop().
    fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
