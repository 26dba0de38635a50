//! REST backend
//!
//! Speaks the Upstash-style Redis-over-HTTP protocol: every command is a JSON
//! array POSTed to the base URL with a bearer token, and the reply is
//! `{"result": ...}` or `{"error": "..."}`. No connection step is needed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::cache::backend::{KvBackend, Payload};
use crate::error::{StoreError, StoreResult};

/// Reply envelope of the REST store.
#[derive(Debug, Deserialize)]
struct RestReply {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

// == REST Backend ==
/// Backend over the REST key-value protocol.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    url: String,
    token: String,
}

impl RestBackend {
    // == Constructor ==
    /// Builds the HTTP client. Only configuration problems can fail here.
    pub fn new(url: &str, token: &str, timeout: Duration) -> StoreResult<Self> {
        if url.is_empty() || token.is_empty() {
            return Err(StoreError::Config(
                "REST store needs both a URL and a token".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StoreError::Config(format!(
                "REST store URL must be http(s): {url}"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Sends one command and returns its `result` field.
    async fn command(&self, args: Vec<String>) -> StoreResult<Value> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        let reply: RestReply = match response.json().await {
            Ok(reply) => reply,
            Err(err) if status.is_success() => return Err(StoreError::Http(err)),
            Err(_) => {
                return Err(StoreError::Rest {
                    status: status.as_u16(),
                    message: status.to_string(),
                })
            }
        };

        if let Some(message) = reply.error {
            return Err(StoreError::Rest {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(StoreError::Rest {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }
        Ok(reply.result)
    }
}

/// String results that hold JSON come back decoded; anything else passes
/// through unchanged.
fn decode_result(result: Value) -> Option<Payload> {
    match result {
        Value::Null => None,
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(value) => Some(Payload::Decoded(value)),
            Err(_) => Some(Payload::Decoded(Value::String(text))),
        },
        other => Some(Payload::Decoded(other)),
    }
}

#[async_trait]
impl KvBackend for RestBackend {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Payload>> {
        let result = self
            .command(vec!["GET".to_string(), key.to_string()])
            .await?;
        Ok(decode_result(result))
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: String) -> StoreResult<()> {
        self.command(vec![
            "SET".to_string(),
            key.to_string(),
            value,
            "EX".to_string(),
            ttl_secs.to_string(),
        ])
        .await?;
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut args = Vec::with_capacity(keys.len() + 1);
        args.push("DEL".to_string());
        args.extend(keys.iter().cloned());
        self.command(args).await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let result = self
            .command(vec!["KEYS".to_string(), pattern.to_string()])
            .await?;
        match result {
            Value::Null => Ok(Vec::new()),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    async fn flush(&self) -> StoreResult<()> {
        self.command(vec!["FLUSHDB".to_string()]).await?;
        Ok(())
    }
}
