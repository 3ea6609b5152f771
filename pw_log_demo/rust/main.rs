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

//! Host demo of the logging pipeline: logs one record per level to standard
//! output, then either exits cleanly or trips an assertion.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::{Parser, ValueEnum};
use pw_log_consumer::{Base64Consumer, ConsoleConsumer};
use pw_log_core::{
    Event, HEADER_SIZE, LogConfig, LogConsumer, LogCore, LogLevel, LogMode, OverflowPolicy,
};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Synchronous,
    Deferred,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OverflowArg {
    Reject,
    DropOldest,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LevelArg {
    None,
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

#[derive(Debug, Parser)]
#[command(about = "Logs a record at every level through pw_log_core")]
struct Cli {
    /// TOML file with a `[log]` table and an optional `buffer_size`.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long, value_enum)]
    overflow: Option<OverflowArg>,
    /// Deferred pushes between worker wake-ups.
    #[arg(long)]
    threshold: Option<usize>,
    #[arg(long, value_enum)]
    min_level: Option<LevelArg>,
    /// Size of the frame queue storage in bytes.
    #[arg(long)]
    buffer_size: Option<usize>,
    /// Emit records as `$`-prefixed Base64.
    #[arg(long)]
    base64: bool,
    /// Prefix records with a short level tag.
    #[arg(long)]
    level_tags: bool,
    /// Finish with a failing assertion instead of exiting cleanly.
    #[arg(long)]
    assert: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DemoConfig {
    log: LogConfig,
    buffer_size: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::DEFAULT,
            buffer_size: 1024,
        }
    }
}

fn load_config(cli: &Cli) -> Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let toml_str = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&toml_str).context("Failed to parse config file")?
        }
        None => DemoConfig::default(),
    };

    if let Some(mode) = cli.mode {
        config.log.mode = match mode {
            ModeArg::Synchronous => LogMode::Synchronous,
            ModeArg::Deferred => LogMode::Deferred,
        };
    }
    if let Some(overflow) = cli.overflow {
        config.log.overflow = match overflow {
            OverflowArg::Reject => OverflowPolicy::Reject,
            OverflowArg::DropOldest => OverflowPolicy::DropOldest,
        };
    }
    if let Some(threshold) = cli.threshold {
        config.log.flush_threshold = threshold;
    }
    if let Some(level) = cli.min_level {
        config.log.min_level = match level {
            LevelArg::None => LogLevel::None,
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Warn => LogLevel::Warn,
            LevelArg::Error => LogLevel::Error,
            LevelArg::Critical => LogLevel::Critical,
        };
    }
    if let Some(buffer_size) = cli.buffer_size {
        config.buffer_size = buffer_size;
    }

    ensure!(
        config.buffer_size > HEADER_SIZE + 1,
        "buffer_size must be larger than {} bytes",
        HEADER_SIZE + 1
    );
    Ok(config)
}

fn console(cli: &Cli) -> &'static dyn LogConsumer {
    let console = if cli.level_tags {
        ConsoleConsumer::with_level_tags()
    } else {
        ConsoleConsumer::new()
    };
    if cli.base64 {
        return Box::leak(Box::new(Base64Consumer::new(console)));
    }
    Box::leak(Box::new(console))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let mut core: LogCore<'static, Event> = LogCore::new(config.log, Event::new());
    core.register_consumer(console(&cli))
        .context("Failed to register the console consumer")?;
    if config.log.mode == LogMode::Deferred {
        let storage = Box::leak(vec![0u8; config.buffer_size].into_boxed_slice());
        core.initialize_queue(storage)
            .context("Failed to initialize the frame queue")?;
    }
    let core: &'static LogCore<'static, Event> = Box::leak(Box::new(core));

    let _worker = match config.log.mode {
        LogMode::Deferred => Some(core.start_worker().context("Failed to start the log thread")?),
        LogMode::Synchronous => None,
    };
    pw_log_core::frontend::set_logger(core).context("Failed to install the global logger")?;

    pw_log_core::debug!(core, "This is a debug message");
    pw_log_core::info!(core, "This is an info message");
    pw_log_core::warn!(core, "This is a warning message");
    pw_log_core::error!(core, "This is an error message");
    pw_log_core::critical!(core, "This is a critical message");
    log::info!("Records from the log crate share the same pipeline");

    pw_log_core::log_assert!(core, !cli.assert, "Assertion requested on the command line");

    core.drain();
    let stats = core.stats();
    println!(
        "queued={} dropped={} overflows={} dispatched={} wakeups={}",
        stats.queued, stats.dropped, stats.overflows, stats.dispatched, stats.wakeups
    );
    Ok(())
}
