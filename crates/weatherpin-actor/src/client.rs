//! HTTP transport for the weather actor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::instrument;
use url::Url;
use weatherpin_core::ActorConfig;

use crate::actor::WeatherActor;
use crate::identity::Identity;
use crate::types::{ActorError, WeatherRequest};

const METHOD_NAME: &str = "get_weather_data";

#[derive(Debug, Clone)]
pub struct HttpWeatherActor {
    client: Arc<Client>,
    method_url: Url,
    identity: Option<Identity>,
}

impl HttpWeatherActor {
    /// Build the actor from config. Runs once at startup; any error here is
    /// an initialization failure and is not retried.
    pub fn connect(config: &ActorConfig) -> Result<Self, ActorError> {
        let identity = Identity::from_config(config)?;
        Self::new(&config.endpoint, config.timeout_secs, &config.user_agent, identity)
    }

    pub fn new(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        identity: Option<Identity>,
    ) -> Result<Self, ActorError> {
        let method_url = method_url(endpoint)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        tracing::info!(
            endpoint = %method_url,
            authenticated = identity.is_some(),
            "Weather actor initialized"
        );

        Ok(Self {
            client: Arc::new(client),
            method_url,
            identity,
        })
    }
}

#[async_trait]
impl WeatherActor for HttpWeatherActor {
    #[instrument(skip(self), level = "info")]
    async fn get_weather_data(&self, city: &str) -> Result<String, ActorError> {
        let mut request = self
            .client
            .post(self.method_url.clone())
            .json(&WeatherRequest::new(city));

        if let Some(identity) = &self.identity {
            request = request.header("Authorization", identity.authorization_header());
        }

        let response = request.send().await?;
        read_reply(response).await
    }
}

fn method_url(endpoint: &str) -> Result<Url, ActorError> {
    let base = Url::parse(endpoint.trim())
        .map_err(|e| ActorError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ActorError::InvalidEndpoint(format!(
            "unsupported scheme '{}'",
            base.scheme()
        )));
    }

    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), METHOD_NAME);
    Url::parse(&joined).map_err(|e| ActorError::InvalidEndpoint(e.to_string()))
}

async fn read_reply(response: Response) -> Result<String, ActorError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        Ok(decode_reply(&body))
    } else {
        tracing::warn!("Weather actor rejected call with status {}", status);
        Err(ActorError::Rejected(rejection_message(status, &body)))
    }
}

/// Replies may come back as a JSON string; anything else is taken as plain text.
fn decode_reply(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(text)) => text,
        _ => body.to_string(),
    }
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}
