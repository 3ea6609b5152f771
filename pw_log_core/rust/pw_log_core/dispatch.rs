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

//! The dispatch coordinator: decides, per record, whether it is delivered
//! now or queued for the worker thread, and owns the panic-mode transition.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::{
    ConsumerId, ConsumerRegistry, DEFAULT_MAX_CONSUMERS, FrameQueue, LogConfig, LogConsumer,
    LogLevel, LogMode, MAX_MESSAGE_LENGTH, Result, SpinLock, WakeSignal,
};

/// Snapshot of the pipeline's diagnostic counters.
///
/// The core never logs about its own failures; these counters are the only
/// place they show up.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LogStats {
    /// Records copied into the frame queue.
    pub queued: usize,
    /// Records dropped because the queue rejected them.
    pub dropped: usize,
    /// Pushes that found the queue full.  Under
    /// [`OverflowPolicy::DropOldest`](crate::OverflowPolicy::DropOldest) each
    /// of them discarded the queued backlog.
    pub overflows: usize,
    /// Records handed to the consumers, queued or not.
    pub dispatched: usize,
    /// Pulls that found a corrupt frame.
    pub corrupt_frames: usize,
    /// Individual consumer failures.
    pub consumer_failures: usize,
    /// Times the worker thread was signaled.
    pub wakeups: usize,
}

#[derive(Default)]
struct Counters {
    queued: AtomicUsize,
    dropped: AtomicUsize,
    dispatched: AtomicUsize,
    corrupt_frames: AtomicUsize,
    consumer_failures: AtomicUsize,
    wakeups: AtomicUsize,
}

fn bump(counter: &AtomicUsize, value: usize) {
    counter.fetch_add(value, Ordering::Relaxed);
}

/// Routes formatted log records to the registered consumers.
///
/// A `LogCore` is built once at start-up: construct it, register consumers
/// and, for deferred delivery, hand it the queue storage with
/// [`LogCore::initialize_queue`].  From then on it is shared by reference
/// between every producer, the worker thread and the fault path.
///
/// ## Panic mode
///
/// [`LogCore::enable_panic_mode`] is a one-way switch.  Once it is set every
/// record is delivered synchronously, and everything still in the queue is
/// drained before the call returns.
///
/// ## Locking
///
/// The frame queue is behind a [`SpinLock`] that is only held to copy one
/// frame in or out.  Drainers additionally hold a drain lock across each
/// pull-and-deliver step so that consumers see frames in push order even
/// when a panic flush overlaps with the worker thread.  Consumers are never
/// called with the queue lock held.
///
/// Both locks are taken inside a critical section, so interrupts stay masked
/// while a frame is copied or delivered.  This lets interrupt handlers log,
/// and fail assertions, without spinning on a lock held by the thread they
/// preempted.
pub struct LogCore<'a, S, const N: usize = DEFAULT_MAX_CONSUMERS> {
    config: LogConfig,
    consumers: ConsumerRegistry<'a, N>,
    queue: SpinLock<Option<FrameQueue<'a>>>,
    drain_lock: SpinLock<()>,
    signal: S,
    panic_mode: AtomicBool,
    pending_pushes: AtomicUsize,
    counters: Counters,
}

impl<'a, S: WakeSignal, const N: usize> LogCore<'a, S, N> {
    /// Creates a core with no consumers and no queue.
    pub fn new(config: LogConfig, signal: S) -> Self {
        Self {
            config,
            consumers: ConsumerRegistry::new(),
            queue: SpinLock::new(None),
            drain_lock: SpinLock::new(()),
            signal,
            panic_mode: AtomicBool::new(false),
            pending_pushes: AtomicUsize::new(0),
            counters: Counters::default(),
        }
    }

    /// Configuration the core was built with.
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Wake signal shared with the worker thread.
    pub fn signal(&self) -> &S {
        &self.signal
    }

    /// Registers `consumer` and returns the slot it was placed in.
    ///
    /// # Errors
    /// - `Error::ResourceExhausted` - all `N` slots are taken.
    /// - Any error the consumer's [`LogConsumer::initialize`] returns.
    pub fn register_consumer(&mut self, consumer: &'a dyn LogConsumer) -> Result<ConsumerId> {
        self.consumers.register(consumer)
    }

    /// Number of registered consumers.
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    /// Hands the core the storage deferred records are queued in.
    ///
    /// Must be called before deferred records arrive; until then they are
    /// delivered synchronously.  Calling it again discards whatever was
    /// queued in the previous storage.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` - `buffer` is too small to hold a frame.
    pub fn initialize_queue(&mut self, buffer: &'a mut [u8]) -> Result<()> {
        let queue = FrameQueue::new(buffer, self.config.overflow)?;
        *self.queue.get_mut() = Some(queue);
        Ok(())
    }

    /// Returns `true` once storage has been handed to
    /// [`LogCore::initialize_queue`].
    pub fn is_queue_initialized(&self) -> bool {
        self.queue.lock().is_some()
    }

    /// Returns `true` once panic mode is enabled.
    pub fn is_panic_mode(&self) -> bool {
        self.panic_mode.load(Ordering::Acquire)
    }

    /// Delivers or queues one formatted record.
    ///
    /// In synchronous mode and in panic mode the record is handed to every
    /// consumer before this returns.  Otherwise it is copied into the frame
    /// queue, and the worker thread is signaled every
    /// [`LogConfig::flush_threshold`] pushes.  Records the queue cannot take
    /// are dropped and counted in [`LogStats::dropped`].  Empty records are
    /// ignored.
    ///
    /// Safe to call from interrupt handlers.
    pub fn handle_message(&self, message: &[u8], level: LogLevel) {
        if message.is_empty() {
            return;
        }

        if self.config.mode == LogMode::Synchronous || self.is_panic_mode() {
            self.deliver(message, level);
            return;
        }

        let pushed = {
            let mut queue = self.queue.lock();
            queue.as_mut().map(|queue| queue.push(message, level))
        };

        match pushed {
            // No storage yet.  Deliver rather than lose start-up records.
            None => self.deliver(message, level),
            Some(Err(_)) => bump(&self.counters.dropped, 1),
            Some(Ok(_)) => {
                bump(&self.counters.queued, 1);
                self.note_push();
                // Panic mode may have been enabled, and its flush finished,
                // between the check above and the push.
                if self.is_panic_mode() {
                    self.drain();
                }
            }
        }
    }

    /// Switches to panic mode and synchronously delivers every queued frame.
    ///
    /// Returns the number of frames drained.  The switch cannot be undone.
    ///
    /// Records from other producers that arrive during the flush are
    /// delivered synchronously and may reach consumers ahead of frames the
    /// flush has not emitted yet.  Each producer's own records stay in order.
    pub fn enable_panic_mode(&self) -> usize {
        self.panic_mode.store(true, Ordering::Release);
        self.drain()
    }

    /// Pulls frames and delivers them until the queue is empty.
    ///
    /// A corrupt frame ends the cycle early (the queue discards its
    /// unparseable backlog) and is counted in [`LogStats::corrupt_frames`].
    /// Returns the number of frames delivered.
    pub fn drain(&self) -> usize {
        let mut scratch = [0u8; MAX_MESSAGE_LENGTH];
        let mut delivered = 0;
        loop {
            let _drain_guard = self.drain_lock.lock();
            let pulled = {
                let mut queue = self.queue.lock();
                match queue.as_mut() {
                    Some(queue) => queue.pull(&mut scratch),
                    None => Ok(None),
                }
            };

            match pulled {
                Ok(Some(frame)) => {
                    self.deliver(&scratch[..frame.length], frame.level);
                    delivered += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    bump(&self.counters.corrupt_frames, 1);
                    break;
                }
            }
        }
        delivered
    }

    /// One cycle of the worker thread: wait for the wake signal, then drain.
    ///
    /// Returns the number of frames delivered.
    pub fn run_worker_cycle(&self) -> usize {
        self.signal.wait();
        self.drain()
    }

    /// Body of the worker thread.  Never returns.
    pub fn run_worker(&self) -> ! {
        loop {
            self.run_worker_cycle();
        }
    }

    /// Snapshot of the diagnostic counters.
    pub fn stats(&self) -> LogStats {
        let overflows = self
            .queue
            .lock()
            .as_ref()
            .map_or(0, |queue| queue.overflows());
        let load = |counter: &AtomicUsize| counter.load(Ordering::Relaxed);
        LogStats {
            queued: load(&self.counters.queued),
            dropped: load(&self.counters.dropped),
            overflows,
            dispatched: load(&self.counters.dispatched),
            corrupt_frames: load(&self.counters.corrupt_frames),
            consumer_failures: load(&self.counters.consumer_failures),
            wakeups: load(&self.counters.wakeups),
        }
    }

    /// Runs `f` with exclusive access to the frame queue, if initialized.
    pub fn with_queue<R>(&self, f: impl FnOnce(&mut FrameQueue<'a>) -> R) -> Option<R> {
        self.queue.lock().as_mut().map(f)
    }

    fn deliver(&self, message: &[u8], level: LogLevel) {
        let report = self.consumers.dispatch(message, level);
        bump(&self.counters.dispatched, 1);
        if report.failed > 0 {
            bump(&self.counters.consumer_failures, report.failed);
        }
    }

    fn note_push(&self) {
        let threshold = self.config.effective_threshold();
        let pending = self.pending_pushes.fetch_add(1, Ordering::AcqRel) + 1;
        // A producer that loses the race to reset the counter leaves the
        // wake-up to the one that won.
        if pending >= threshold
            && self
                .pending_pushes
                .compare_exchange(pending, 0, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
        {
            bump(&self.counters.wakeups, 1);
            self.signal.signal();
        }
    }
}

#[cfg(feature = "std")]
impl<S: WakeSignal + 'static, const N: usize> LogCore<'static, S, N> {
    /// Starts the worker thread draining this core.
    ///
    /// # Errors
    /// - `Error::FailedPrecondition` - the core is not in deferred mode or
    ///   has no queue.
    /// - `Error::Unavailable` - the thread could not be created.
    pub fn start_worker(&'static self) -> Result<crate::LogThread> {
        if self.config.mode != LogMode::Deferred || !self.is_queue_initialized() {
            return Err(crate::Error::FailedPrecondition);
        }
        crate::LogThread::spawn(&self.config, move || {
            self.run_worker_cycle();
        })
    }
}
