//! Rendering surfaces for the panel.

use std::io::Write;

use weatherpin_core::WeatherError;

use crate::models::state::{PanelState, PanelStatus};

/// A surface that draws the panel. It only ever reads state.
pub trait PanelView {
    fn render(&mut self, state: &PanelState);
}

/// Plain-text view for terminals and pipes.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a block of text outside the panel (help, banners).
    pub fn print(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }

    fn write_state(&mut self, state: &PanelState) -> std::io::Result<()> {
        writeln!(self.out, "---- Weather ----")?;
        writeln!(self.out, "{}", state.status.display_text())?;
        match &state.status {
            PanelStatus::Loading { city } => writeln!(self.out, "(fetching {})", city)?,
            PanelStatus::Success {
                temperature: None, ..
            } => writeln!(self.out, "({})", WeatherError::NoTemperature)?,
            _ => {}
        }

        let pin_hint = if state.pin_enabled() {
            "pin: available"
        } else {
            "pin: unavailable"
        };
        writeln!(self.out, "[{}]", pin_hint)?;

        writeln!(
            self.out,
            "Pinned ({}/{}):",
            state.pinned.len(),
            state.max_pinned
        )?;
        for (i, entry) in state.pinned.iter().enumerate() {
            write!(self.out, "  {}. {}", i + 1, entry.label())?;
            if entry.loading {
                write!(self.out, "  (loading...)")?;
            } else if let Some(error) = &entry.error {
                write!(self.out, "  ! {}", error)?;
            } else {
                write!(
                    self.out,
                    "  (updated {})",
                    entry.refreshed_at.format("%H:%M:%S UTC")
                )?;
            }
            writeln!(self.out, "  [refresh {0}] [delete {0}]", i + 1)?;
        }

        if let Some(notice) = &state.notice {
            writeln!(self.out, "* {}", notice)?;
        }
        self.out.flush()
    }
}

impl<W: Write> PanelView for TerminalView<W> {
    fn render(&mut self, state: &PanelState) {
        if let Err(e) = self.write_state(state) {
            tracing::warn!("Failed to render panel: {}", e);
        }
    }
}
