use std::net::SocketAddr;
use std::time::Duration;

use log::{error, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, Sender};

use crate::config::Config;
use crate::connection::connection_task;
use crate::errors::ServerError;
use crate::handlers;
use crate::state::ServerState;
use crate::users::UserId;

const EVENT_CHANNEL_SIZE: usize = 1024;
const OUTBOUND_CHANNEL_SIZE: usize = 512;
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(1);

/// Everything that can wake the broker. The broker task is the sole owner
/// of the registry; every other task only ever sends one of these.
#[derive(Debug)]
pub enum Event {
    Connected {
        stream: TcpStream,
        addr: SocketAddr,
    },
    Line {
        user_id: UserId,
        line: String,
    },
    Disconnected {
        user_id: UserId,
        reason: &'static str,
    },
    Shutdown,
}

/// Binds the listener and runs the broker loop until a shutdown signal.
/// Returns cleanly after the graceful teardown; binding errors are fatal.
pub async fn run(config: Config, password: String) -> Result<(), ServerError> {
    let addr = format!("{}:{}", config.network.bind_address, config.network.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;
    info!(
        "{} listening on {} (max {} clients)",
        config.server.name, addr, config.network.max_connections
    );

    let (tx_event, mut rx_event) = mpsc::channel::<Event>(EVENT_CHANNEL_SIZE);
    let accept_handle = tokio::spawn(accept_task(listener, tx_event.clone()));
    tokio::spawn(shutdown_signal(tx_event.clone()));

    let mut state = ServerState::new(config, password);
    let mut maintenance = tokio::time::interval(MAINTENANCE_INTERVAL);

    loop {
        tokio::select! {
            event = rx_event.recv() => {
                let Some(event) = event else { break };
                match event {
                    Event::Connected { stream, addr } => {
                        accept_client(&mut state, stream, addr, &tx_event);
                    }
                    Event::Line { user_id, line } => {
                        handlers::dispatch(&mut state, user_id, &line);
                    }
                    Event::Disconnected { user_id, reason } => {
                        if reason == "Excess flood" {
                            state.send_line(user_id, format!("ERROR :{reason}"));
                        }
                        state.remove_user(user_id, reason);
                    }
                    Event::Shutdown => {
                        state.shutdown();
                        break;
                    }
                }
            }
            _ = maintenance.tick() => {
                state.reap_empty_channels();
            }
        }
    }

    accept_handle.abort();
    info!("server shutdown complete");
    Ok(())
}

async fn accept_task(listener: TcpListener, tx_event: Sender<Event>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                if tx_event.send(Event::Connected { stream, addr }).await.is_err() {
                    break; // broker is gone
                }
            }
            Err(e) => {
                warn!("failed to accept connection: {e}");
            }
        }
    }
}

fn accept_client(
    state: &mut ServerState,
    stream: TcpStream,
    addr: SocketAddr,
    tx_event: &Sender<Event>,
) {
    let max_connections = state.config.network.max_connections;
    if state.users.len() >= max_connections {
        info!("connection from {addr} rejected - server full");
        tokio::spawn(async move {
            let mut stream = stream;
            let message = format!("ERROR :Server is full (max {max_connections} clients)\r\n");
            let _ = stream.write_all(message.as_bytes()).await;
        });
        return;
    }

    if let Err(e) = stream.set_nodelay(true) {
        warn!("failed to set nodelay on client socket: {e}");
    }

    let (tx_outbound, rx_outbound) = mpsc::channel(OUTBOUND_CHANNEL_SIZE);
    let user_id = state.add_user(addr.ip().to_string(), tx_outbound);
    tokio::spawn(connection_task(stream, user_id, rx_outbound, tx_event.clone()));

    info!(
        "client connected from {} (id: {}) - total: {}/{}",
        addr,
        user_id,
        state.users.len(),
        max_connections
    );
}

/// SIGINT and SIGTERM both request a graceful stop; the handler's only job
/// is to enqueue the shutdown event for the broker's next tick.
async fn shutdown_signal(tx_event: Sender<Event>) {
    use tokio::signal;

    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!("cannot install SIGTERM handler: {e}");
                if let Err(e) = signal::ctrl_c().await {
                    error!("cannot wait for ctrl-c: {e}");
                    return;
                }
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            error!("cannot wait for ctrl-c: {e}");
            return;
        }
    }

    info!("signal received, initiating graceful shutdown");
    let _ = tx_event.send(Event::Shutdown).await;
}
