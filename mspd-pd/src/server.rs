//! TCP server for the station control protocol

use crate::protocol::{dispatch, hello, Command, Response, StationControl};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Shared handle to the daemon state; one command executes at a time
pub type SharedControl<C> = Arc<Mutex<C>>;

/// Accept clients on `listener` until the task is dropped
pub async fn serve<C>(listener: TcpListener, control: SharedControl<C>)
where
    C: StationControl + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Control server listening on {}", addr);
    }

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };

        info!("Client connected from {}", peer);
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, control).await {
                debug!("Connection error from {}: {}", peer, e);
            }
            info!("Connection to {} lost", peer);
        });
    }
}

/// Run the protocol on one connection until the client hangs up
pub async fn handle_connection<S, C>(stream: S, control: SharedControl<C>) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    C: StationControl + Send,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    writer.write_all(format!("{}\n", hello()).as_bytes()).await?;
    writer.flush().await?;

    while let Some(line) = lines.next_line().await? {
        debug!("Request: {}", line.trim());

        let response = match Command::parse(&line) {
            Ok(command) => {
                let mut control = control.lock().await;
                dispatch(command, &mut *control).await
            }
            Err(reply) => Response::from(reply),
        };

        writer.write_all(response.to_wire().as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}
