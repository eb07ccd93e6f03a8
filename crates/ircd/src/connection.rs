use log::{debug, error};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::server::Event;
use crate::users::UserId;
use crate::wire::{FramingError, LineFramer, OutboundLine};

const READ_CHUNK_SIZE: usize = 4096;

/// One task per client socket. Reads feed the framer and become events for
/// the broker; writes drain the per-user outbound queue. Reading stops at
/// EOF or error, but writing continues until the broker drops the sender,
/// so queued replies (an ERROR frame, a final broadcast) still reach the
/// wire before the socket closes.
pub async fn connection_task(
    stream: TcpStream,
    user_id: UserId,
    mut rx_outbound: Receiver<OutboundLine>,
    tx_event: Sender<Event>,
) {
    let (mut reader, mut writer) = stream.into_split();
    let mut framer = LineFramer::new();
    let mut buf = [0u8; READ_CHUNK_SIZE];
    let mut reading = true;

    loop {
        tokio::select! {
            maybe_line = rx_outbound.recv() => {
                match maybe_line {
                    Some(line) => {
                        if let Err(e) = writer.write_all(line.raw.as_bytes()).await {
                            debug!("[{user_id}] write failed: {e}");
                            let _ = tx_event
                                .send(Event::Disconnected { user_id, reason: "Connection error" })
                                .await;
                            break;
                        }
                    }
                    // the broker dropped the user: we are done
                    None => break,
                }
            }

            read = reader.read(&mut buf), if reading => {
                match read {
                    Ok(0) => {
                        let _ = tx_event
                            .send(Event::Disconnected { user_id, reason: "Client disconnected" })
                            .await;
                        reading = false;
                    }
                    Ok(n) => match framer.push(&buf[..n]) {
                        Ok(lines) => {
                            for line in lines {
                                if tx_event
                                    .send(Event::Line { user_id, line })
                                    .await
                                    .is_err()
                                {
                                    return;
                                }
                            }
                        }
                        Err(FramingError::ExcessFlood) => {
                            let _ = tx_event
                                .send(Event::Disconnected { user_id, reason: "Excess flood" })
                                .await;
                            reading = false;
                        }
                    },
                    Err(e) => {
                        error!("[{user_id}] read failed: {e}");
                        let _ = tx_event
                            .send(Event::Disconnected { user_id, reason: "Connection error" })
                            .await;
                        reading = false;
                    }
                }
            }
        }
    }
}
