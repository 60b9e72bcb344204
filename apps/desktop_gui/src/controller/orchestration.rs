//! Dispatch of UI actions onto the bounded backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command for the backend worker without blocking the frame.
/// Queue pressure and a dead worker both surface through the status line.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::LoadRoster => "load_roster",
        BackendCommand::UpdateCommission { .. } => "update_commission",
        BackendCommand::ClearCommission { .. } => "clear_commission",
        BackendCommand::FetchAvatar { .. } => "fetch_avatar",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; try again shortly".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker is not running (command channel disconnected); restart the app"
                    .to_string();
        }
    }
}
