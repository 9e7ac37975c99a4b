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

//! HTTP transport seam
//!
//! Both the Jolokia gateway and the admin console client talk to the broker through a
//! [`Transport`]. The production implementation is [`HttpTransport`] (reqwest); tests plug in
//! an in-memory broker instead.

use std::time::Duration;

use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use activemq_error::TransportError;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::LOCATION;
use reqwest::header::ORIGIN;
use reqwest::Client;
use reqwest::Response;
use serde_json::Value;

/// Raw outcome of one HTTP round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResult {
    pub code: u16,
    pub content: String,
    /// `Location` header, present on console redirects
    pub location: Option<String>,
}

impl HttpResult {
    pub fn new(code: u16, content: impl Into<String>) -> Self {
        Self {
            code,
            content: content.into(),
            location: None,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// One HTTP round trip. Implementations must be safe to share between concurrent requests.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// POST a JSON body and return the raw reply.
    async fn post_json(&self, url: &str, body: &Value) -> ActiveMQResult<HttpResult>;

    /// GET a page without following redirects.
    async fn get(&self, url: &str) -> ActiveMQResult<HttpResult>;
}

/// Credentials and headers applied to every request
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub origin: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_millis: u64,
}

/// reqwest backed transport. The underlying connection pool is shared by clones and released
/// when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    username: Option<String>,
    password: Option<String>,
    timeout_millis: u64,
}

impl HttpTransport {
    pub fn new(options: HttpOptions) -> ActiveMQResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(origin) = &options.origin {
            let value = HeaderValue::from_str(origin)
                .map_err(|e| ActiveMQError::config_invalid("origin", e.to_string()))?;
            headers.insert(ORIGIN, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(options.timeout_millis))
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(format!("activemq-manager/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ActiveMQError::internal(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            username: options.username,
            password: options.password,
            timeout_millis: options.timeout_millis,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_ref()),
            None => request,
        }
    }

    fn map_error(&self, url: &str, err: reqwest::Error) -> ActiveMQError {
        if err.is_timeout() {
            TransportError::request_timeout(url, self.timeout_millis).into()
        } else if err.is_connect() {
            TransportError::connection_failed(url, err.to_string()).into()
        } else {
            TransportError::request_failed(url, err.to_string()).into()
        }
    }

    async fn process_response(&self, url: &str, response: Response) -> ActiveMQResult<HttpResult> {
        let code = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let content = response.text().await.map_err(|e| self.map_error(url, e))?;
        Ok(HttpResult {
            code,
            content,
            location,
        })
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> ActiveMQResult<HttpResult> {
        let response = self
            .authorize(self.client.post(url).json(body))
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;
        self.process_response(url, response).await
    }

    async fn get(&self, url: &str) -> ActiveMQResult<HttpResult> {
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;
        self.process_response(url, response).await
    }
}

#[cfg(test)]
mod tests {
    use activemq_error::ActiveMQError;

    use super::HttpOptions;
    use super::HttpResult;
    use super::HttpTransport;
    use super::Transport;

    #[test]
    fn success_range() {
        assert!(HttpResult::new(200, "").is_success());
        assert!(HttpResult::new(204, "").is_success());
        assert!(!HttpResult::new(302, "").is_success());
        assert!(!HttpResult::new(404, "").is_success());
    }

    #[test]
    fn invalid_origin_is_config_error() {
        let err = HttpTransport::new(HttpOptions {
            origin: Some("bad\norigin".to_string()),
            timeout_millis: 1000,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ActiveMQError::ConfigInvalid { key: "origin", .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let transport = HttpTransport::new(HttpOptions {
            timeout_millis: 2000,
            ..Default::default()
        })
        .unwrap();
        let err = transport
            .post_json("http://127.0.0.1:1/api/jolokia", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ActiveMQError::Transport(_)));
    }
}
