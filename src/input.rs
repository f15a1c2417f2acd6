//! Feeds stdin lines into the panel loop.

use std::io::BufRead;
use std::sync::mpsc::Sender;

use weatherpin_panel::PanelMessage;

/// Read lines from `reader` on a dedicated thread until EOF or the loop hangs up.
pub fn spawn_reader<R>(reader: R, tx: Sender<PanelMessage>) -> std::io::Result<std::thread::JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    std::thread::Builder::new()
        .name("weatherpin-input".into())
        .spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(l) => l,
                    Err(e) => {
                        tracing::warn!("Failed to read input: {}", e);
                        break;
                    }
                };
                if tx.send(PanelMessage::Input(line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(PanelMessage::InputClosed);
        })
}
