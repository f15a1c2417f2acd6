pub mod panel_model;
pub mod state;
