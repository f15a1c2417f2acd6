//! The pinned weather panel.
//!
//! [`PanelController`] owns all panel state and is driven by [`Command`]s and
//! fetch completions. Remote calls are described as [`FetchRequest`]s and run
//! by [`services::request_fetch`]; surfaces only ever see state through
//! [`PanelView::render`].

pub mod command;
pub mod error;
pub mod models;
pub mod services;
pub mod temperature;
pub mod view;

pub use command::Command;
pub use error::PanelError;
pub use models::panel_model::PanelController;
pub use models::state::{
    CurrentResult, EntryId, FetchCompletion, FetchRequest, PanelState, PanelStatus, PinnedEntry,
    RequestToken, Slot,
};
pub use services::{request_fetch, PanelMessage};
pub use temperature::extract_temperature;
pub use view::{PanelView, TerminalView};
