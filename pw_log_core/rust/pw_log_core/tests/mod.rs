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
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{Error, LogConsumer, LogLevel, Result, WakeSignal};

mod queue;

/// Keeps a copy of every record it is handed.
#[derive(Default)]
pub(crate) struct RecordingConsumer {
    records: Mutex<Vec<(Vec<u8>, LogLevel)>>,
    initialized: AtomicUsize,
}

impl RecordingConsumer {
    pub(crate) fn texts(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(bytes, _)| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    pub(crate) fn records(&self) -> Vec<(Vec<u8>, LogLevel)> {
        self.records.lock().unwrap().clone()
    }

    pub(crate) fn levels(&self) -> Vec<LogLevel> {
        self.records.lock().unwrap().iter().map(|(_, level)| *level).collect()
    }

    pub(crate) fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub(crate) fn initialize_calls(&self) -> usize {
        self.initialized.load(Ordering::Relaxed)
    }
}

impl LogConsumer for RecordingConsumer {
    fn initialize(&self) -> Result<()> {
        self.initialized.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn process_message(&self, message: &[u8], level: LogLevel) -> Result<()> {
        self.records.lock().unwrap().push((message.to_vec(), level));
        Ok(())
    }
}

/// Rejects every record.
#[derive(Default)]
pub(crate) struct FailingConsumer {
    calls: AtomicUsize,
}

impl FailingConsumer {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl LogConsumer for FailingConsumer {
    fn process_message(&self, _message: &[u8], _level: LogLevel) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(Error::Unavailable)
    }
}

/// Counts wake-ups instead of waking anybody.
#[derive(Default)]
pub(crate) struct CountingSignal {
    signals: AtomicUsize,
}

impl CountingSignal {
    pub(crate) fn signals(&self) -> usize {
        self.signals.load(Ordering::Relaxed)
    }
}

impl WakeSignal for CountingSignal {
    fn signal(&self) {
        self.signals.fetch_add(1, Ordering::Relaxed);
    }

    fn wait(&self) {}
}
