pub mod fetch_service;

pub use fetch_service::{request_fetch, PanelMessage};
