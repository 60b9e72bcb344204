//! Backend worker: a dedicated thread owning the HTTP client and a tokio
//! runtime. It drains the UI command queue and answers with events; the GUI
//! thread never blocks on the network.

use crossbeam_channel::{Receiver, Sender};

use client_core::BackendClient;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{AvatarImage, UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    std::thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let message =
                    format!("backend worker startup failure: failed to build runtime: {err}");
                tracing::error!("{message}");
                send_error(&ui_tx, UiErrorContext::BackendStartup, message);
                return;
            }
        };

        runtime.block_on(run_worker(cmd_rx, ui_tx));
    });
}

async fn run_worker(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let settings = client_core::config::load_settings();
    let client = match BackendClient::new(&settings) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(error = %err, "backend client construction failed");
            send_error(&ui_tx, UiErrorContext::BackendStartup, err.to_string());
            return;
        }
    };
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

    // Commands arrive from the GUI thread; awaits happen between recvs, so a
    // blocking recv on this dedicated thread is fine.
    while let Ok(cmd) = cmd_rx.recv() {
        handle_command(&client, &ui_tx, cmd).await;
    }
    tracing::info!("backend worker stopped; UI command channel closed");
}

async fn handle_command(client: &BackendClient, ui_tx: &Sender<UiEvent>, cmd: BackendCommand) {
    match cmd {
        BackendCommand::LoadRoster => {
            tracing::info!("backend: load_roster");
            match client.list_members().await {
                Ok(rows) => {
                    let _ = ui_tx.try_send(UiEvent::RosterLoaded(rows));
                }
                Err(err) => {
                    tracing::error!(error = %err, "load_roster failed");
                    send_error(ui_tx, UiErrorContext::LoadRoster, err.to_string());
                    return;
                }
            }
            // The reference prices ride along with every roster load.
            match client.list_service_items().await {
                Ok(rows) => {
                    let _ = ui_tx.try_send(UiEvent::ServiceItemsLoaded(rows));
                }
                Err(err) => {
                    tracing::error!(error = %err, "list_service_items failed");
                    send_error(ui_tx, UiErrorContext::LoadRoster, err.to_string());
                }
            }
        }
        BackendCommand::UpdateCommission {
            member_id,
            commission,
        } => {
            tracing::info!(
                member_id = member_id.0,
                amount = commission.amount,
                kind = commission.kind.as_wire(),
                "backend: update_commission"
            );
            match client.update_member_commission(member_id, commission).await {
                Ok(()) => {
                    let _ = ui_tx.try_send(UiEvent::CommissionSaved {
                        member_id,
                        commission,
                    });
                }
                Err(err) => {
                    tracing::error!(error = %err, member_id = member_id.0, "update_commission failed");
                    send_error(ui_tx, UiErrorContext::SaveCommission, err.to_string());
                }
            }
        }
        BackendCommand::ClearCommission { member_id } => {
            tracing::info!(member_id = member_id.0, "backend: clear_commission");
            match client.clear_member_commission(member_id).await {
                Ok(()) => {
                    let _ = ui_tx.try_send(UiEvent::CommissionCleared { member_id });
                }
                Err(err) => {
                    tracing::error!(error = %err, member_id = member_id.0, "clear_commission failed");
                    send_error(ui_tx, UiErrorContext::ClearCommission, err.to_string());
                }
            }
        }
        BackendCommand::FetchAvatar { member_id, url } => {
            tracing::debug!(member_id = member_id.0, "backend: fetch_avatar");
            let decoded = client
                .fetch_avatar(&url)
                .await
                .and_then(|bytes| decode_avatar_image(&bytes));
            let event = match decoded {
                Ok(image) => UiEvent::AvatarReady { member_id, image },
                Err(err) => UiEvent::AvatarFailed {
                    member_id,
                    reason: err.to_string(),
                },
            };
            let _ = ui_tx.try_send(event);
        }
    }
}

fn send_error(ui_tx: &Sender<UiEvent>, context: UiErrorContext, message: impl Into<String>) {
    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(context, message)));
}

/// Avatars render at badge size; decode to a small thumbnail before handing
/// pixels across the channel.
fn decode_avatar_image(bytes: &[u8]) -> anyhow::Result<AvatarImage> {
    let decoded = image::load_from_memory(bytes)?.thumbnail(128, 128);
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(AvatarImage {
        size,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::decode_avatar_image;
    use std::io::Cursor;

    #[test]
    fn decodes_png_bytes_into_rgba_pixels() {
        let mut png = Vec::new();
        image::RgbaImage::new(4, 4)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode test png");

        let avatar = decode_avatar_image(&png).expect("decode avatar");
        assert_eq!(avatar.size, [4, 4]);
        assert_eq!(avatar.rgba.len(), 4 * 4 * 4);
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        assert!(decode_avatar_image(b"not an image").is_err());
    }
}
