use chrono::Utc;
use weatherpin_actor::ActorError;
use weatherpin_core::{WeatherError, MAX_PINNED_LIMIT};

use crate::command::Command;
use crate::error::PanelError;
use crate::models::state::{
    CurrentResult, EntryId, FetchCompletion, FetchRequest, PanelState, PanelStatus, PinnedEntry,
    RequestToken, Slot, PROMPT_MESSAGE,
};
use crate::temperature::extract_temperature;

/// Owns the panel state and applies every transition.
///
/// Operations that need the remote actor return a [`FetchRequest`]; the
/// caller runs it and feeds the result back through [`complete`]. Each slot
/// remembers the token of its latest request, and results carrying any
/// other token are dropped, so a slow reply never overwrites a newer one.
///
/// [`complete`]: PanelController::complete
#[derive(Debug)]
pub struct PanelController {
    state: PanelState,
    next_token: u64,
    next_entry_id: u64,
    current_pending: Option<RequestToken>,
}

impl PanelController {
    pub fn new(max_pinned: usize) -> Self {
        let max_pinned = max_pinned.clamp(1, MAX_PINNED_LIMIT);
        Self {
            state: PanelState::new(max_pinned),
            next_token: 0,
            next_entry_id: 0,
            current_pending: None,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Whether any issued call has not come back yet.
    pub fn has_pending(&self) -> bool {
        self.current_pending.is_some() || self.state.pinned.iter().any(|e| e.pending.is_some())
    }

    /// Record that the actor could not be set up. Shown once; calls issued
    /// afterwards fail individually.
    pub fn initialization_failed(&mut self, message: &str) {
        tracing::error!("Weather actor initialization failed: {}", message);
        self.state.status = PanelStatus::Unavailable {
            message: message.to_string(),
        };
        self.state.current = None;
    }

    /// Apply a user command.
    pub fn handle(&mut self, command: Command) -> Result<Option<FetchRequest>, PanelError> {
        self.state.notice = None;
        match command {
            Command::Submit(input) => Ok(self.submit(&input)),
            Command::Enter(input) => Ok(self.enter(&input)),
            Command::Pin => {
                self.pin();
                Ok(None)
            }
            Command::Refresh(position) => {
                let id = self.resolve(position)?;
                Ok(self.refresh(id))
            }
            Command::Delete(position) => {
                let id = self.resolve(position)?;
                self.delete(id);
                Ok(None)
            }
            Command::Help | Command::Quit => Ok(None),
        }
    }

    /// Show a command error on the panel.
    pub fn report(&mut self, error: &PanelError) {
        self.state.notice = Some(error.to_string());
    }

    /// Submit the city input. Empty input shows a prompt and issues nothing;
    /// a call still in flight for the result area is abandoned.
    pub fn submit(&mut self, input: &str) -> Option<FetchRequest> {
        let city = input.trim();
        if city.is_empty() {
            if let Some(token) = self.current_pending.take() {
                tracing::debug!(?token, "Abandoning in-flight fetch for empty submit");
            }
            self.state.status = PanelStatus::Idle {
                prompt: Some(PROMPT_MESSAGE.to_string()),
            };
            return None;
        }

        let token = self.issue_token();
        self.current_pending = Some(token);
        self.state.status = PanelStatus::Loading {
            city: city.to_string(),
        };
        tracing::debug!(city, ?token, "Fetching weather");

        Some(FetchRequest {
            slot: Slot::Current,
            token,
            city: city.to_string(),
        })
    }

    /// Enter in the input field.
    pub fn enter(&mut self, input: &str) -> Option<FetchRequest> {
        self.submit(input)
    }

    /// Pin the current result. Returns the new entry, or `None` when pinning
    /// is not possible right now.
    pub fn pin(&mut self) -> Option<EntryId> {
        if !self.state.pin_enabled() {
            tracing::debug!("Pin ignored: no pinnable result or list full");
            return None;
        }
        let current = self.state.current.clone()?;

        let id = EntryId(self.next_entry_id);
        self.next_entry_id += 1;
        self.state.pinned.push(PinnedEntry {
            id,
            city: current.city,
            temperature: current.temperature,
            loading: false,
            error: None,
            refreshed_at: Utc::now(),
            pending: None,
        });
        tracing::info!(entry = %id, "Pinned ({}/{})", self.state.pinned.len(), self.state.max_pinned);
        Some(id)
    }

    /// Re-fetch one pinned entry. Only that entry shows as loading.
    pub fn refresh(&mut self, id: EntryId) -> Option<FetchRequest> {
        let token = self.issue_token();
        let entry = self.state.pinned.iter_mut().find(|e| e.id == id)?;

        entry.loading = true;
        entry.error = None;
        entry.pending = Some(token);
        tracing::debug!(entry = %id, city = %entry.city, ?token, "Refreshing pinned entry");

        Some(FetchRequest {
            slot: Slot::Pinned(id),
            token,
            city: entry.city.clone(),
        })
    }

    /// Remove a pinned entry. Any refresh still in flight for it is ignored.
    pub fn delete(&mut self, id: EntryId) -> bool {
        let before = self.state.pinned.len();
        self.state.pinned.retain(|e| e.id != id);
        let removed = self.state.pinned.len() < before;
        if removed {
            tracing::info!(entry = %id, "Deleted pinned entry");
        }
        removed
    }

    /// Apply a finished call. Returns `false` when the result was stale and dropped.
    pub fn complete(&mut self, completion: FetchCompletion) -> bool {
        let FetchCompletion { request, outcome } = completion;
        match request.slot {
            Slot::Current => self.complete_current(request, outcome),
            Slot::Pinned(id) => self.complete_pinned(id, request.token, outcome),
        }
    }

    fn complete_current(
        &mut self,
        request: FetchRequest,
        outcome: Result<String, ActorError>,
    ) -> bool {
        if self.current_pending != Some(request.token) {
            tracing::debug!(token = ?request.token, city = %request.city, "Dropping stale result");
            return false;
        }
        self.current_pending = None;

        match outcome {
            Ok(text) => {
                let temperature = extract_temperature(&text);
                if temperature.is_none() {
                    tracing::warn!(city = %request.city, "No temperature in reply: {}", text);
                }
                self.state.current = temperature.clone().map(|temperature| CurrentResult {
                    city: request.city,
                    temperature,
                });
                self.state.status = PanelStatus::Success { text, temperature };
            }
            Err(e) => {
                log_failure(&request.city, &e);
                self.state.current = None;
                self.state.status = PanelStatus::Failed {
                    message: e.message(),
                };
            }
        }
        true
    }

    fn complete_pinned(
        &mut self,
        id: EntryId,
        token: RequestToken,
        outcome: Result<String, ActorError>,
    ) -> bool {
        let Some(entry) = self.state.pinned.iter_mut().find(|e| e.id == id) else {
            tracing::debug!(entry = %id, "Dropping result for deleted entry");
            return false;
        };
        if entry.pending != Some(token) {
            tracing::debug!(entry = %id, ?token, "Dropping stale refresh");
            return false;
        }
        entry.pending = None;
        entry.loading = false;

        match outcome.map(|text| extract_temperature(&text)) {
            Ok(Some(temperature)) => {
                entry.temperature = temperature;
                entry.error = None;
                entry.refreshed_at = Utc::now();
            }
            Ok(None) => {
                entry.error = Some(WeatherError::NoTemperature.to_string());
            }
            Err(e) => {
                log_failure(&entry.city, &e);
                entry.error = Some(format!("Error: {}", e.message()));
            }
        }
        true
    }

    fn resolve(&self, position: usize) -> Result<EntryId, PanelError> {
        self.state
            .entry_at(position)
            .ok_or(PanelError::NoSuchEntry(position))
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }
}

fn log_failure(city: &str, error: &ActorError) {
    if error.is_initialization() {
        tracing::error!(city, "Weather actor unavailable: {}", error);
    } else {
        tracing::warn!(city, "Error fetching weather: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(request: FetchRequest, text: &str) -> FetchCompletion {
        FetchCompletion {
            request,
            outcome: Ok(text.to_string()),
        }
    }

    fn err(request: FetchRequest, message: &str) -> FetchCompletion {
        FetchCompletion {
            request,
            outcome: Err(ActorError::Rejected(message.to_string())),
        }
    }

    /// Fetch `city` and resolve it with `text`.
    fn fetched(controller: &mut PanelController, city: &str, text: &str) {
        let request = controller.submit(city).unwrap();
        assert!(controller.complete(ok(request, text)));
    }

    fn pin_cities(controller: &mut PanelController, cities: &[&str]) {
        for (i, city) in cities.iter().enumerate() {
            fetched(controller, city, &format!("{} degrees", 10 + i));
            assert!(controller.pin().is_some());
        }
    }

    #[test]
    fn test_empty_submit_prompts_without_request() {
        let mut controller = PanelController::new(5);
        assert!(controller.submit("").is_none());
        assert!(controller.submit("   \t").is_none());
        assert_eq!(
            controller.state().status.display_text(),
            "Please enter a city name"
        );
        assert!(!controller.has_pending());
    }

    #[test]
    fn test_empty_submit_abandons_in_flight_fetch() {
        let mut controller = PanelController::new(5);
        let request = controller.submit("Paris").unwrap();
        assert!(controller.submit("  ").is_none());
        assert!(!controller.has_pending());

        assert!(!controller.complete(ok(request, "-0.5 deg")));
        assert_eq!(
            controller.state().status,
            PanelStatus::Idle {
                prompt: Some(PROMPT_MESSAGE.to_string())
            }
        );
        assert!(!controller.state().pin_enabled());
    }

    #[test]
    fn test_enter_and_submit_take_same_path() {
        let mut a = PanelController::new(5);
        let mut b = PanelController::new(5);

        let ra = a.handle(Command::Submit(" Paris ".into())).unwrap();
        let rb = b.handle(Command::Enter(" Paris ".into())).unwrap();

        assert_eq!(ra, rb);
        assert_eq!(a.state().status, b.state().status);
        assert_eq!(ra.unwrap().city, "Paris");
    }

    #[test]
    fn test_submit_enters_loading() {
        let mut controller = PanelController::new(5);
        let request = controller.submit("Paris").unwrap();
        assert_eq!(request.slot, Slot::Current);
        assert!(controller.state().status.is_loading());
        assert_eq!(controller.state().status.display_text(), "Loading...");
        assert!(!controller.state().pin_enabled());
        assert!(controller.has_pending());
    }

    #[test]
    fn test_paris_example() {
        let mut controller = PanelController::new(5);
        fetched(&mut controller, "Paris", "22.5 degrees");

        assert_eq!(controller.state().status.display_text(), "22.5 degrees");
        assert!(controller.state().pin_enabled());

        controller.pin().unwrap();
        let entry = &controller.state().pinned[0];
        assert_eq!(entry.city, "Paris");
        assert_eq!(entry.temperature, "22.5");
        assert_eq!(entry.label(), "Paris: 22.5°C");
    }

    #[test]
    fn test_reply_without_number_disables_pin() {
        let mut controller = PanelController::new(5);
        fetched(&mut controller, "Atlantis", "No results found for this city");

        assert_eq!(
            controller.state().status,
            PanelStatus::Success {
                text: "No results found for this city".into(),
                temperature: None,
            }
        );
        assert!(!controller.state().pin_enabled());
        assert!(controller.pin().is_none());
        assert!(controller.state().pinned.is_empty());
    }

    #[test]
    fn test_failure_clears_current_and_disables_pin() {
        let mut controller = PanelController::new(5);
        fetched(&mut controller, "Paris", "22.5 degrees");
        assert!(controller.state().pin_enabled());

        let request = controller.submit("Nowhere").unwrap();
        controller.complete(err(request, "City not found"));

        assert_eq!(controller.state().current_city(), None);
        assert_eq!(controller.state().current_temperature(), None);
        assert!(!controller.state().pin_enabled());
        assert_eq!(
            controller.state().status.display_text(),
            "Error: City not found"
        );
    }

    #[test]
    fn test_failure_without_message_uses_fallback() {
        let mut controller = PanelController::new(5);
        let request = controller.submit("Paris").unwrap();
        controller.complete(err(request, ""));
        assert_eq!(
            controller.state().status.display_text(),
            "Error: Failed to fetch weather data"
        );
    }

    #[test]
    fn test_pin_at_capacity_is_noop() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["A", "B", "C", "D", "E"]);
        assert_eq!(controller.state().pinned.len(), 5);

        fetched(&mut controller, "F", "30 degrees");
        assert!(!controller.state().pin_enabled());
        assert!(controller.pin().is_none());
        assert_eq!(controller.state().pinned.len(), 5);
    }

    #[test]
    fn test_max_pinned_is_clamped() {
        assert_eq!(PanelController::new(0).state().max_pinned, 1);
        assert_eq!(PanelController::new(50).state().max_pinned, 5);
    }

    #[test]
    fn test_delete_removes_exactly_one_and_reopens_pin() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["A", "B", "C", "D", "E"]);
        assert!(!controller.state().pin_enabled());

        let target = controller.state().entry_at(3).unwrap();
        assert!(controller.delete(target));

        let cities: Vec<_> = controller
            .state()
            .pinned
            .iter()
            .map(|e| e.city.as_str())
            .collect();
        assert_eq!(cities, ["A", "B", "D", "E"]);
        // The last fetched result ("E") is still valid and capacity reopened.
        assert!(controller.state().pin_enabled());
    }

    #[test]
    fn test_delete_does_not_enable_pin_without_result() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["A", "B", "C", "D", "E"]);

        let request = controller.submit("Nowhere").unwrap();
        controller.complete(err(request, "boom"));

        let first = controller.state().entry_at(1).unwrap();
        controller.delete(first);
        assert_eq!(controller.state().pinned.len(), 4);
        assert!(!controller.state().pin_enabled());
    }

    #[test]
    fn test_refresh_updates_only_that_entry() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["Paris", "Oslo"]);

        let oslo = controller.state().entry_at(2).unwrap();
        let request = controller.refresh(oslo).unwrap();
        assert_eq!(request.slot, Slot::Pinned(oslo));
        assert_eq!(request.city, "Oslo");
        assert!(controller.state().entry(oslo).unwrap().loading);
        assert!(!controller.state().pinned[0].loading);

        assert!(controller.complete(ok(request, "19 degrees")));

        assert_eq!(controller.state().pinned[0].label(), "Paris: 10°C");
        assert_eq!(controller.state().pinned[1].label(), "Oslo: 19°C");
        assert!(!controller.state().pinned[1].loading);
    }

    #[test]
    fn test_refresh_failure_keeps_entry_with_inline_error() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["Paris"]);
        let paris = controller.state().entry_at(1).unwrap();

        let request = controller.refresh(paris).unwrap();
        controller.complete(err(request, "timeout"));

        let entry = controller.state().entry(paris).unwrap();
        assert_eq!(entry.temperature, "10");
        assert_eq!(entry.error.as_deref(), Some("Error: timeout"));
        assert!(!entry.loading);

        // Next refresh clears the error while loading.
        controller.refresh(paris).unwrap();
        assert_eq!(controller.state().entry(paris).unwrap().error, None);
    }

    #[test]
    fn test_refresh_without_number_is_inline_error() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["Paris"]);
        let paris = controller.state().entry_at(1).unwrap();

        let request = controller.refresh(paris).unwrap();
        controller.complete(ok(request, "Failed to get temperature data"));

        let entry = controller.state().entry(paris).unwrap();
        assert_eq!(entry.temperature, "10");
        assert_eq!(entry.error.as_deref(), Some("No temperature found"));
    }

    #[test]
    fn test_stale_current_result_is_dropped() {
        let mut controller = PanelController::new(5);
        let first = controller.submit("Paris").unwrap();
        let second = controller.submit("Oslo").unwrap();

        assert!(controller.complete(ok(second, "5 degrees")));
        assert!(!controller.complete(ok(first, "22 degrees")));

        assert_eq!(controller.state().status.display_text(), "5 degrees");
        assert_eq!(controller.state().current_city(), Some("Oslo"));
    }

    #[test]
    fn test_stale_refresh_is_dropped() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["Paris"]);
        let paris = controller.state().entry_at(1).unwrap();

        let old = controller.refresh(paris).unwrap();
        let new = controller.refresh(paris).unwrap();

        assert!(controller.complete(ok(new, "15 degrees")));
        assert!(!controller.complete(ok(old, "3 degrees")));
        assert_eq!(controller.state().entry(paris).unwrap().temperature, "15");
    }

    #[test]
    fn test_concurrent_refreshes_are_independent() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["Paris", "Oslo"]);
        let paris = controller.state().entry_at(1).unwrap();
        let oslo = controller.state().entry_at(2).unwrap();

        let rp = controller.refresh(paris).unwrap();
        let ro = controller.refresh(oslo).unwrap();

        assert!(controller.complete(err(ro, "boom")));
        assert!(controller.state().entry(paris).unwrap().loading);
        assert!(controller.complete(ok(rp, "21 degrees")));

        assert_eq!(controller.state().entry(paris).unwrap().label(), "Paris: 21°C");
        assert!(controller.state().entry(oslo).unwrap().error.is_some());
        assert!(!controller.has_pending());
    }

    #[test]
    fn test_result_for_deleted_entry_is_dropped() {
        let mut controller = PanelController::new(5);
        pin_cities(&mut controller, &["Paris", "Oslo"]);
        let paris = controller.state().entry_at(1).unwrap();

        let request = controller.refresh(paris).unwrap();
        controller.delete(paris);

        assert!(!controller.complete(ok(request, "1 degrees")));
        assert_eq!(controller.state().pinned.len(), 1);
        assert_eq!(controller.state().pinned[0].city, "Oslo");
    }

    #[test]
    fn test_handle_reports_missing_entries() {
        let mut controller = PanelController::new(5);
        assert_eq!(
            controller.handle(Command::Refresh(1)),
            Err(PanelError::NoSuchEntry(1))
        );
        assert_eq!(
            controller.handle(Command::Delete(3)),
            Err(PanelError::NoSuchEntry(3))
        );
    }

    #[test]
    fn test_initialization_failure_is_displayed() {
        let mut controller = PanelController::new(5);
        controller.initialization_failed("Invalid endpoint: nope");
        assert_eq!(
            controller.state().status.display_text(),
            "Error initializing: Invalid endpoint: nope"
        );

        let request = controller.submit("Paris").unwrap();
        controller.complete(FetchCompletion {
            request,
            outcome: Err(ActorError::NotInitialized),
        });
        assert_eq!(
            controller.state().status.display_text(),
            "Error: Weather actor not initialized"
        );
    }
}
