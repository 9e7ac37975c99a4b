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

//! MBean object names
//!
//! Object names are the resource paths of every management call, e.g.
//! `org.apache.activemq:type=Broker,brokerName=localhost,destinationType=Queue,destinationName=q1`.
//! Search replies return them as strings; [`ObjectName::parse`] splits them back into
//! their key/value properties so the identifying field can be extracted.

use std::fmt;
use std::str::FromStr;

use activemq_error::DecodeError;

/// JMX domain every ActiveMQ MBean lives in
pub const ACTIVEMQ_DOMAIN: &str = "org.apache.activemq";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    domain: Option<String>,
    properties: Vec<(String, String)>,
}

impl ObjectName {
    /// Name of the broker MBean itself: `org.apache.activemq:type=Broker,brokerName=<name>`.
    pub fn broker(broker_name: impl Into<String>) -> Self {
        Self {
            domain: Some(ACTIVEMQ_DOMAIN.to_string()),
            properties: vec![
                ("type".to_string(), "Broker".to_string()),
                ("brokerName".to_string(), broker_name.into()),
            ],
        }
    }

    /// Append a property; later values for the same key replace earlier ones.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.properties.push((key, value)),
        }
        self
    }

    /// Split `[domain:]key=value[,key=value...]` into its properties.
    ///
    /// The domain prefix is optional. Values may themselves contain `:` or `=`; only the
    /// first `=` of each property separates key from value.
    pub fn parse(name: &str) -> Result<Self, DecodeError> {
        let invalid = |reason: &str| DecodeError::InvalidObjectName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let (domain, rest) = match (name.find(':'), name.find('=')) {
            (Some(colon), Some(eq)) if colon < eq => (Some(name[..colon].to_string()), &name[colon + 1..]),
            (Some(colon), None) => (Some(name[..colon].to_string()), &name[colon + 1..]),
            _ => (None, name),
        };

        if rest.trim().is_empty() {
            return Err(invalid("no properties"));
        }

        let mut properties = Vec::new();
        for part in rest.split(',') {
            let (key, value) = part.split_once('=').ok_or_else(|| invalid("property without '='"))?;
            if key.is_empty() {
                return Err(invalid("empty property key"));
            }
            properties.push((key.to_string(), value.to_string()));
        }

        Ok(Self { domain, properties })
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get) but a missing key is a decode failure.
    pub fn require(&self, key: &str) -> Result<&str, DecodeError> {
        self.get(key)
            .ok_or_else(|| DecodeError::missing_field(key, format!("object name '{self}'")))
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(domain) = &self.domain {
            write!(f, "{domain}:")?;
        }
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for ObjectName {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_domain() {
        let name = ObjectName::parse("brokerName=x,type=Broker,destinationName=q1").unwrap();
        assert_eq!(name.domain(), None);
        assert_eq!(name.get("destinationName"), Some("q1"));
        assert_eq!(name.get("brokerName"), Some("x"));
        assert_eq!(name.get("missing"), None);
    }

    #[test]
    fn parse_with_domain_and_colon_in_value() {
        let name = ObjectName::parse(
            "org.apache.activemq:type=Broker,brokerName=localhost,connector=clientConnectors,\
             connectorName=openwire,connectionViewType=remoteAddress,connectionName=tcp://127.0.0.1:51234",
        )
        .unwrap();
        assert_eq!(name.domain(), Some(ACTIVEMQ_DOMAIN));
        assert_eq!(name.get("connectionName"), Some("tcp://127.0.0.1:51234"));
        assert_eq!(name.get("connectorName"), Some("openwire"));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(ObjectName::parse("").is_err());
        assert!(ObjectName::parse("org.apache.activemq:").is_err());
        assert!(ObjectName::parse("type=Broker,garbage").is_err());
        assert!(ObjectName::parse("=value").is_err());
    }

    #[test]
    fn require_reports_missing_key() {
        let name = ObjectName::parse("type=Broker").unwrap();
        let err = name.require("connectionName").unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { .. }));
    }

    #[test]
    fn builder_display_round_trips() {
        let name = ObjectName::broker("localhost")
            .with("destinationType", "Queue")
            .with("destinationName", "orders");
        let text = name.to_string();
        assert_eq!(
            text,
            "org.apache.activemq:type=Broker,brokerName=localhost,destinationType=Queue,destinationName=orders"
        );
        assert_eq!(text.parse::<ObjectName>().unwrap(), name);
    }

    #[test]
    fn with_replaces_existing_key() {
        let name = ObjectName::broker("a").with("brokerName", "b");
        assert_eq!(name.get("brokerName"), Some("b"));
        assert_eq!(name.properties().count(), 2);
    }
}
