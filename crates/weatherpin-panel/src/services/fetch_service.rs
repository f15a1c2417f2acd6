//! Fetch backend: runs actor calls off the panel loop.
//! Results come back as `PanelMessage::FetchDone` over mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use weatherpin_actor::{ActorError, WeatherActor};

use crate::models::state::{FetchCompletion, FetchRequest};

/// Everything the panel loop reacts to.
#[derive(Debug)]
pub enum PanelMessage {
    /// One line of user input
    Input(String),
    /// The input source is exhausted
    InputClosed,
    /// A remote call finished
    FetchDone(FetchCompletion),
}

/// Run `request` against the actor asynchronously.
/// Sends `FetchDone` on the channel when complete; without an actor or a
/// runtime the call fails immediately with `NotInitialized`.
pub fn request_fetch(
    tx: &Sender<PanelMessage>,
    runtime: Option<&tokio::runtime::Handle>,
    actor: Option<Arc<dyn WeatherActor>>,
    request: FetchRequest,
) {
    let tx = tx.clone();

    let (runtime, actor) = match (runtime, actor) {
        (Some(r), Some(a)) => (r, a),
        _ => {
            let _ = tx.send(PanelMessage::FetchDone(FetchCompletion {
                request,
                outcome: Err(ActorError::NotInitialized),
            }));
            return;
        }
    };

    runtime.spawn(async move {
        let outcome = actor.get_weather_data(&request.city).await;
        match &outcome {
            Ok(_) => tracing::debug!(city = %request.city, "Actor call resolved"),
            Err(e) => tracing::debug!(city = %request.city, "Actor call rejected: {}", e),
        }
        if tx
            .send(PanelMessage::FetchDone(FetchCompletion { request, outcome }))
            .is_err()
        {
            tracing::debug!("Panel loop gone; dropping fetch result");
        }
    });
}
