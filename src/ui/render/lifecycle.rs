use std::time::Duration;

use tokio::sync::watch;

use crate::shutdown::ShutdownSender;
use crate::ui::model::UiData;

use super::dashboard::{Ui, UiActions};

/// How long the final frame stays up before the terminal is restored.
const FINAL_FRAME_HOLD: Duration = Duration::from_millis(1200);

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Ui::cleanup();
    }
}

/// Spawns the dashboard task. It redraws on every snapshot and exits when the
/// run finishes, a shutdown is broadcast, or the sender is dropped.
#[must_use]
pub fn setup_render_ui(
    shutdown_tx: &ShutdownSender,
    ui_tx: &watch::Sender<UiData>,
) -> tokio::task::JoinHandle<()> {
    let mut ui_rx = ui_tx.subscribe();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut terminal = match Ui::setup_terminal() {
            Ok(terminal) => terminal,
            Err(err) => {
                tracing::error!("Failed to setup terminal: {}", err);
                return;
            }
        };
        let _guard = TerminalGuard;

        let initial = ui_rx.borrow().clone();
        Ui::render(&mut terminal, &initial);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                res = ui_rx.changed() => {
                    if res.is_err() {
                        break;
                    }
                    let data = ui_rx.borrow().clone();
                    Ui::render(&mut terminal, &data);
                    if data.termination.is_some() {
                        tokio::time::sleep(FINAL_FRAME_HOLD).await;
                        break;
                    }
                }
            }
        }
    })
}
