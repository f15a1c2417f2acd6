use serde::Serialize;
use weatherpin_core::{AppError, ReqwestErrorExt, WeatherError};

/// Shown when a failure carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch weather data";

/// Arguments of the actor's `get_weather_data` method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherRequest {
    pub city: String,
}

impl WeatherRequest {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into() }
    }
}

/// Weather actor errors
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The actor answered, but with a rejection. The payload is its message.
    #[error("{0}")]
    Rejected(String),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),
    #[error("Weather actor not initialized")]
    NotInitialized,
}

impl ActorError {
    /// Human-readable message for display, never empty.
    pub fn message(&self) -> String {
        let msg = match self {
            ActorError::Rejected(m) => m.trim().to_string(),
            other => other.to_string(),
        };
        if msg.is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            msg
        }
    }

    /// Whether this error means the actor could not be set up at all.
    pub fn is_initialization(&self) -> bool {
        matches!(
            self,
            ActorError::InvalidEndpoint(_) | ActorError::InvalidIdentity(_) | ActorError::NotInitialized
        )
    }
}

impl From<ActorError> for AppError {
    fn from(e: ActorError) -> Self {
        match e {
            ActorError::Network(err) => AppError::Network(err.into_network_error()),
            ActorError::Rejected(m) => AppError::Weather(WeatherError::Rejected(m)),
            ActorError::InvalidEndpoint(m) | ActorError::InvalidIdentity(m) => {
                AppError::Weather(WeatherError::InitializationFailed(m))
            }
            ActorError::NotInitialized => AppError::Weather(WeatherError::NotInitialized),
        }
    }
}
