//! TCP transport: the accept loop and per-connection line handling.
//!
//! Each accepted socket gets its own tokio task. The task reads
//! newline-delimited JSON requests, runs them through the shared
//! [`CommandProcessor`], and writes one JSON response line per request.
//! Robots launched on a connection belong to it and are removed from the
//! world when the connection goes away, cleanly or not.

use log::{error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::processor::CommandProcessor;

/// Accepts connections forever, spawning a handler task per client.
pub async fn serve(listener: TcpListener, processor: Arc<CommandProcessor>) {
    loop {
        match listener.accept().await {
            Ok((socket, addr)) => {
                info!("Client connected from {}", addr);
                let processor = Arc::clone(&processor);
                tokio::spawn(async move {
                    handle_connection(socket, processor).await;
                    info!("Client {} disconnected", addr);
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_connection(socket: TcpStream, processor: Arc<CommandProcessor>) {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    // Robots launched over this connection, removed on teardown.
    let mut owned: Vec<String> = Vec::new();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Read error on client connection: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let outcome = processor.process(&line).await;
        if let Some(name) = outcome.launched {
            owned.push(name);
        }

        let mut payload = serde_json::to_string(&outcome.response).unwrap_or_else(|e| {
            error!("Failed to serialize response: {}", e);
            r#"{"result":"ERROR","data":{"message":"Internal server error"}}"#.to_string()
        });
        payload.push('\n');

        if let Err(e) = writer.write_all(payload.as_bytes()).await {
            warn!("Write error on client connection: {}", e);
            break;
        }

        if outcome.disconnect {
            break;
        }
    }

    processor.release_robots(&owned).await;
}
