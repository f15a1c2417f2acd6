//! Client side of the remote weather actor.
//!
//! The actor exposes one method, `get_weather_data(city) -> text`. This crate
//! defines that capability as the [`WeatherActor`] trait and ships an HTTP
//! implementation that attaches the caller's identity.

pub mod actor;
pub mod client;
pub mod identity;
pub mod types;

pub use actor::WeatherActor;
pub use client::HttpWeatherActor;
pub use identity::Identity;
pub use types::{ActorError, WeatherRequest, GENERIC_FAILURE_MESSAGE};
