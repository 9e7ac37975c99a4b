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

use std::fmt::Debug;
use std::path::Path;

use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use config::Config;
use config::Environment;
use config::File;
use serde::de::DeserializeOwned;

/// Environment variable prefix for configuration overrides, e.g. `ACTIVEMQ_BROKER_NAME`.
pub const ENV_PREFIX: &str = "ACTIVEMQ";

/// Layer `ACTIVEMQ_*` environment variables over an optional file.
///
/// Fields missing from both sources fall back to the serde defaults of `C`.
pub fn parse_config<C>(config_file: Option<&Path>) -> ActiveMQResult<C>
where
    C: Debug + DeserializeOwned,
{
    parse_config_with_env(config_file, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
}

pub(crate) fn parse_config_with_env<C>(config_file: Option<&Path>, env: Environment) -> ActiveMQResult<C>
where
    C: Debug + DeserializeOwned,
{
    let mut builder = Config::builder();
    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path));
    }
    let cfg = builder
        .add_source(env)
        .build()
        .map_err(|e| ActiveMQError::config_parse_failed(e.to_string()))?;
    cfg.try_deserialize::<C>()
        .map_err(|e| ActiveMQError::config_parse_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        broker_name: String,
        #[serde(default = "default_workers")]
        workers: usize,
    }

    fn default_workers() -> usize {
        10
    }

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    #[test]
    fn parse_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "broker_name = \"amq-1\"\nworkers = 4").unwrap();

        let sample: Sample = parse_config_with_env(Some(file.path()), no_env()).unwrap();
        assert_eq!(sample.broker_name, "amq-1");
        assert_eq!(sample.workers, 4);
    }

    #[test]
    fn missing_file_is_parse_error() {
        let err = parse_config_with_env::<Sample>(Some(Path::new("/nonexistent/activemq.toml")), no_env()).unwrap_err();
        assert!(matches!(err, ActiveMQError::ConfigParseFailed { .. }));
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "broker_name = \"amq-1\"").unwrap();

        let mut vars = HashMap::new();
        vars.insert("ACTIVEMQ_BROKER_NAME".to_string(), "amq-2".to_string());
        vars.insert("ACTIVEMQ_WORKERS".to_string(), "3".to_string());
        let env = Environment::with_prefix(ENV_PREFIX).try_parsing(true).source(Some(vars));

        let sample: Sample = parse_config_with_env(Some(file.path()), env).unwrap();
        assert_eq!(sample.broker_name, "amq-2");
        assert_eq!(sample.workers, 3);
    }
}
