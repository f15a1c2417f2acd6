use async_trait::async_trait;

use crate::types::ActorError;

/// The remote weather capability.
///
/// Implementations resolve with the actor's text reply, which is displayed
/// verbatim and may or may not contain a temperature.
#[async_trait]
pub trait WeatherActor: Send + Sync {
    /// Call the actor's `get_weather_data` method for `city`.
    async fn get_weather_data(&self, city: &str) -> Result<String, ActorError>;
}
