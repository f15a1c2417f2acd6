use chrono::{DateTime, Utc};
use weatherpin_actor::ActorError;

pub const PROMPT_MESSAGE: &str = "Please enter a city name";
pub const LOADING_MESSAGE: &str = "Loading...";

/// Stable identity of a pinned entry. Positions shift on delete; ids don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonically increasing tag on every issued call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(pub(crate) u64);

/// Where a call's result lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The main result area
    Current,
    /// One pinned entry
    Pinned(EntryId),
}

/// A remote call the controller wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub slot: Slot,
    pub token: RequestToken,
    pub city: String,
}

/// A finished remote call, routed back to the controller.
#[derive(Debug)]
pub struct FetchCompletion {
    pub request: FetchRequest,
    pub outcome: Result<String, ActorError>,
}

/// The last successfully fetched city that had a temperature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentResult {
    pub city: String,
    pub temperature: String,
}

/// What the main result area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStatus {
    /// Nothing submitted yet, or an empty submit (with the prompt shown)
    Idle { prompt: Option<String> },
    /// A call for `city` is in flight
    Loading { city: String },
    /// The actor's reply, verbatim. `temperature` is `None` when the reply had no number.
    Success {
        text: String,
        temperature: Option<String>,
    },
    Failed { message: String },
    /// The actor could not be set up at startup
    Unavailable { message: String },
}

impl PanelStatus {
    /// Text for the result display element.
    pub fn display_text(&self) -> String {
        match self {
            PanelStatus::Idle { prompt } => prompt.clone().unwrap_or_default(),
            PanelStatus::Loading { .. } => LOADING_MESSAGE.to_string(),
            PanelStatus::Success { text, .. } => text.clone(),
            PanelStatus::Failed { message } => format!("Error: {}", message),
            PanelStatus::Unavailable { message } => format!("Error initializing: {}", message),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PanelStatus::Loading { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedEntry {
    pub id: EntryId,
    pub city: String,
    pub temperature: String,
    /// A refresh for this entry is in flight
    pub loading: bool,
    /// Inline error from the last refresh, cleared on the next one
    pub error: Option<String>,
    pub refreshed_at: DateTime<Utc>,
    pub(crate) pending: Option<RequestToken>,
}

impl PinnedEntry {
    /// `"<city>: <temperature>°C"`
    pub fn label(&self) -> String {
        format!("{}: {}°C", self.city, self.temperature)
    }
}

/// Everything a view needs to draw the panel.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub status: PanelStatus,
    pub current: Option<CurrentResult>,
    pub pinned: Vec<PinnedEntry>,
    pub max_pinned: usize,
    /// Feedback for the last command that could not be carried out
    pub notice: Option<String>,
}

impl PanelState {
    pub fn new(max_pinned: usize) -> Self {
        Self {
            status: PanelStatus::Idle { prompt: None },
            current: None,
            pinned: Vec::new(),
            max_pinned,
            notice: None,
        }
    }

    /// Pinning needs a successful result with a temperature and free capacity.
    pub fn pin_enabled(&self) -> bool {
        matches!(
            self.status,
            PanelStatus::Success {
                temperature: Some(_),
                ..
            }
        ) && self.current.is_some()
            && self.pinned.len() < self.max_pinned
    }

    pub fn entry(&self, id: EntryId) -> Option<&PinnedEntry> {
        self.pinned.iter().find(|e| e.id == id)
    }

    /// Id of the entry at a 1-based position.
    pub fn entry_at(&self, position: usize) -> Option<EntryId> {
        position
            .checked_sub(1)
            .and_then(|i| self.pinned.get(i))
            .map(|e| e.id)
    }

    pub fn current_city(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.city.as_str())
    }

    pub fn current_temperature(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.temperature.as_str())
    }
}
