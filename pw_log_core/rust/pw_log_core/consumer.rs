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

//! Log output consumers and the registry records are fanned out through.

use crate::{Error, LogLevel, Result};

/// An output sink for finished log records.
///
/// Implementations exist for consoles, serial ports and encoded transports
/// (see the `pw_log_consumer` crate).
///
/// A consumer is called from whichever context delivers the record: the
/// logging call itself in synchronous or panic mode, or the worker thread in
/// deferred mode.  It must therefore be `Sync`, must not block indefinitely
/// and must never log through the pipeline it is registered with.
pub trait LogConsumer: Sync {
    /// Prepares the consumer for output.  Called once, at registration.
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Writes one record.
    ///
    /// `message` is only valid for the duration of the call.
    fn process_message(&self, message: &[u8], level: LogLevel) -> Result<()>;
}

/// Slot index a consumer was registered in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ConsumerId(pub usize);

/// Outcome of fanning one record out to the registered consumers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DispatchReport {
    /// Consumers that accepted the record.
    pub delivered: usize,
    /// Consumers that returned an error.
    pub failed: usize,
}

/// A fixed-capacity, append-only list of consumers.
///
/// Consumers are registered at start-up, before records start flowing, and
/// are called in registration order.  There is no removal.
pub struct ConsumerRegistry<'a, const N: usize> {
    slots: [Option<&'a dyn LogConsumer>; N],
}

impl<'a, const N: usize> ConsumerRegistry<'a, N> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: [None; N] }
    }

    /// Number of registered consumers.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if no consumer is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Maximum number of consumers.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Initializes `consumer` and places it in the first free slot.
    ///
    /// # Errors
    /// - `Error::ResourceExhausted` - every slot is taken.  The registry is
    ///   unchanged and `consumer` is not initialized.
    /// - Any error returned by [`LogConsumer::initialize`]; the consumer is
    ///   not registered.
    pub fn register(&mut self, consumer: &'a dyn LogConsumer) -> Result<ConsumerId> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(Error::ResourceExhausted);
        };
        consumer.initialize()?;
        self.slots[index] = Some(consumer);
        Ok(ConsumerId(index))
    }

    /// Delivers `message` to every registered consumer, in slot order.
    ///
    /// A consumer that fails does not stop delivery to the ones after it.
    pub fn dispatch(&self, message: &[u8], level: LogLevel) -> DispatchReport {
        let mut report = DispatchReport::default();
        for consumer in self.slots.iter().flatten() {
            match consumer.process_message(message, level) {
                Ok(()) => report.delivered += 1,
                Err(_) => report.failed += 1,
            }
        }
        report
    }
}

impl<const N: usize> Default for ConsumerRegistry<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
