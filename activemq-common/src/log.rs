// Copyright 2024 The ActiveMQ Manager Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::str::FromStr;

/// Initializes the global `tracing` subscriber.
///
/// The level is read from the `RUST_LOG` environment variable and falls back to `INFO` when
/// the variable is unset or holds something other than a plain level name. Output includes
/// thread names, thread ids and line numbers.
///
/// Calling this more than once is harmless; later calls leave the first subscriber in place.
pub fn init_logger() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    init_logger_with_level(level);
}

pub fn init_logger_with_level(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_thread_names(true)
        .with_level(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_max_level(level.as_tracing())
        .try_init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Level(&'static str);

impl Level {
    pub const ERROR: Level = Level("ERROR");

    pub const WARN: Level = Level("WARN");

    pub const INFO: Level = Level("INFO");

    pub const DEBUG: Level = Level("DEBUG");

    pub const TRACE: Level = Level("TRACE");

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    fn as_tracing(&self) -> tracing::Level {
        match self.0 {
            "ERROR" => tracing::Level::ERROR,
            "WARN" => tracing::Level::WARN,
            "DEBUG" => tracing::Level::DEBUG,
            "TRACE" => tracing::Level::TRACE,
            _ => tracing::Level::INFO,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::ERROR),
            "WARN" => Ok(Level::WARN),
            "INFO" => Ok(Level::INFO),
            "DEBUG" => Ok(Level::DEBUG),
            "TRACE" => Ok(Level::TRACE),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.0)
    }
}
