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
use core::convert::Infallible;

use embedded_io::{ErrorKind, ErrorType, Write};
use pw_log_core::{
    Error, LogConfig, LogConsumer, LogCore, LogLevel, MAX_MESSAGE_LENGTH, NoopSignal,
    OverflowPolicy,
};

use crate::base64::{encode, encode_prefixed, encoded_size, prefixed_encoded_size};
use crate::colors::log_level_tag;
use crate::{Base64Consumer, SerialConsumer};

#[derive(Default)]
struct MemoryPort {
    bytes: Vec<u8>,
    flushes: usize,
}

impl ErrorType for MemoryPort {
    type Error = Infallible;
}

impl Write for MemoryPort {
    fn write(&mut self, buf: &[u8]) -> core::result::Result<usize, Self::Error> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> core::result::Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

struct BrokenPort;

impl ErrorType for BrokenPort {
    type Error = ErrorKind;
}

impl Write for BrokenPort {
    fn write(&mut self, _buf: &[u8]) -> core::result::Result<usize, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn flush(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

fn port_text(consumer: &SerialConsumer<MemoryPort>) -> String {
    consumer.with_port(|port| String::from_utf8(port.bytes.clone()).unwrap())
}

#[test]
fn encodes_standard_vectors() {
    let cases: [(&[u8], &str); 6] = [
        (b"", ""),
        (b"f", "Zg=="),
        (b"fo", "Zm8="),
        (b"foo", "Zm9v"),
        (b"foobar", "Zm9vYmFy"),
        ("I 💖 Pigweed".as_bytes(), "SSDwn5KWIFBpZ3dlZWQ="),
    ];
    for (input, expected) in cases {
        let mut output = vec![0u8; encoded_size(input.len())];
        let len = encode(input, &mut output).unwrap();
        assert_eq!(core::str::from_utf8(&output[..len]).unwrap(), expected);
    }
}

#[test]
fn too_small_output_buffer_returns_error() {
    let mut output = [0u8; 5];
    assert_eq!(encode(b"hi", &mut output[..3]), Err(Error::OutOfRange));
    assert_eq!(encode(b"hi", &mut output[..4]), Ok(4));

    assert_eq!(encode_prefixed(b"hi", &mut output[..4]), Err(Error::OutOfRange));
    assert_eq!(encode_prefixed(b"hi", &mut []), Err(Error::OutOfRange));
    assert_eq!(encode_prefixed(b"hi", &mut output), Ok(prefixed_encoded_size(2)));
    assert_eq!(&output, b"$aGk=");
}

#[test]
fn serial_consumer_writes_and_flushes_each_record() {
    let serial = SerialConsumer::new(MemoryPort::default());
    serial.process_message(b"one\n", LogLevel::Info).unwrap();
    serial.process_message(b"two\n", LogLevel::Warn).unwrap();

    assert_eq!(port_text(&serial), "one\ntwo\n");
    assert_eq!(serial.with_port(|port| port.flushes), 2);
}

#[test]
fn serial_consumer_prefixes_level_tags() {
    let serial = SerialConsumer::with_level_tags(MemoryPort::default());
    serial.process_message(b"hot\n", LogLevel::Error).unwrap();

    assert_eq!(
        port_text(&serial),
        format!("{} hot\n", log_level_tag(LogLevel::Error))
    );
}

#[test]
fn port_errors_become_unavailable() {
    let serial = SerialConsumer::new(BrokenPort);
    assert_eq!(
        serial.process_message(b"lost", LogLevel::Info),
        Err(Error::Unavailable)
    );
}

#[test]
fn base64_consumer_sends_prefixed_lines() {
    let encoded = Base64Consumer::new(SerialConsumer::new(MemoryPort::default()));
    encoded.process_message(b"hi", LogLevel::Info).unwrap();
    encoded.process_message(b"\x01\x02\x03", LogLevel::Info).unwrap();

    assert_eq!(port_text(encoded.inner()), "$aGk=\n$AQID\n");
}

#[test]
fn base64_consumer_passes_oversized_records_through() {
    let encoded = Base64Consumer::new(SerialConsumer::new(MemoryPort::default()));
    let record = vec![b'r'; 2 * MAX_MESSAGE_LENGTH];
    encoded.process_message(&record, LogLevel::Info).unwrap();

    encoded.inner().with_port(|port| assert_eq!(port.bytes, record));
}

#[test]
fn level_tags_name_every_level() {
    let tags = [
        (LogLevel::Debug, "DBG"),
        (LogLevel::Info, "INF"),
        (LogLevel::Warn, "WRN"),
        (LogLevel::Error, "ERR"),
        (LogLevel::Critical, "CRT"),
    ];
    for (level, tag) in tags {
        assert!(log_level_tag(level).contains(tag));
    }
}

#[test]
fn deferred_core_drains_into_serial_port() {
    let serial = SerialConsumer::new(MemoryPort::default());
    let mut storage = [0u8; 512];
    let mut core: LogCore<'_, NoopSignal> = LogCore::new(
        LogConfig::deferred(OverflowPolicy::DropOldest, 8),
        NoopSignal,
    );
    core.register_consumer(&serial).unwrap();
    core.initialize_queue(&mut storage).unwrap();

    pw_log_core::info!(core, "sensor {} ready", 1);
    pw_log_core::warn!(core, "sensor {} slow", 2);
    assert_eq!(port_text(&serial), "");

    assert_eq!(core.drain(), 2);
    let text = port_text(&serial);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("INFO ") && lines[0].ends_with(" - sensor 1 ready"));
    assert!(lines[1].starts_with("WARN ") && lines[1].ends_with(" - sensor 2 slow"));
}
