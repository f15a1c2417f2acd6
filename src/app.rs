//! Panel lifecycle: connect the actor, then drive the controller from one loop.

use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use weatherpin_actor::{HttpWeatherActor, WeatherActor};
use weatherpin_core::{AppError, Config, ConfigError};
use weatherpin_panel::command::HELP_TEXT;
use weatherpin_panel::{request_fetch, Command, PanelController, PanelMessage, PanelView, TerminalView};

use crate::input;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Run the panel until the user quits, or input ends and no call is in flight.
pub fn run<R, W>(config: &Config, reader: R, out: W) -> Result<()>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let validation = config.validate();
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }
    if !validation.is_valid() {
        let err = AppError::from(ConfigError::Invalid(validation.error_summary()));
        tracing::error!(hint = err.user_message(), "{}", err);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("weatherpin-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    let mut controller = PanelController::new(config.panel.max_pinned);
    let actor = connect(config, &mut controller);

    let mut view = TerminalView::new(out);
    view.print("Type a city name and press Enter, or 'help'.");
    view.render(controller.state());

    let (tx, rx) = mpsc::channel();
    input::spawn_reader(reader, tx.clone()).context("Failed to start input reader")?;

    let mut input_closed = false;
    while let Ok(message) = rx.recv() {
        let changed = match message {
            PanelMessage::Input(line) => match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => {
                    view.print(HELP_TEXT);
                    false
                }
                Ok(command) => {
                    match controller.handle(command) {
                        Ok(Some(request)) => {
                            request_fetch(&tx, Some(runtime.handle()), actor.clone(), request)
                        }
                        Ok(None) => {}
                        Err(e) => controller.report(&e),
                    }
                    true
                }
                Err(e) => {
                    controller.report(&e);
                    true
                }
            },
            PanelMessage::InputClosed => {
                tracing::debug!("Input closed");
                input_closed = true;
                false
            }
            PanelMessage::FetchDone(done) => controller.complete(done),
        };

        if changed {
            view.render(controller.state());
        }
        if input_closed && !controller.has_pending() {
            break;
        }
    }

    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    Ok(())
}

/// Set up the actor once. On failure the panel shows why and runs without one.
fn connect(config: &Config, controller: &mut PanelController) -> Option<Arc<dyn WeatherActor>> {
    match HttpWeatherActor::connect(&config.actor) {
        Ok(actor) => Some(Arc::new(actor)),
        Err(e) => {
            let message = e.message();
            let app_err = AppError::from(e);
            tracing::error!(hint = app_err.user_message(), "{}", app_err);
            controller.initialization_failed(&message);
            None
        }
    }
}
