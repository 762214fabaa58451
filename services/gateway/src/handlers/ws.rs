use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::Response,
};
use grid_replay::streamer::{FrameSink, SinkError};
use std::io;

pub async fn stream_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let ws = ws.map_err(|rejection| {
        AppError::BadRequest(format!("WebSocket upgrade required: {rejection}"))
    })?;

    tracing::debug!(
        active_sessions = state.metrics.snapshot().active_sessions,
        "Accepting stream connection"
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    // The client sends nothing; the server pushes until done or disconnected.
    let mut sink = WebSocketSink::new(socket);
    let report = state.replay.run_session(&mut sink).await;

    // Failures were already logged inside the session span.
    tracing::debug!(
        session_id = %report.session_id,
        outcome = report.outcome.label(),
        "Stream session finished"
    );
}

/// Frame sink over an upgraded WebSocket. Each frame is one binary message.
pub struct WebSocketSink {
    socket: WebSocket,
    closed: bool,
}

impl WebSocketSink {
    pub fn new(socket: WebSocket) -> Self {
        Self {
            socket,
            closed: false,
        }
    }
}

#[async_trait]
impl FrameSink for WebSocketSink {
    async fn send_frame(&mut self, frame: Vec<u8>) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Disconnected);
        }
        self.socket
            .send(Message::Binary(frame.into()))
            .await
            .map_err(classify_send_error)
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.socket
            .send(Message::Close(None))
            .await
            .map_err(classify_send_error)
    }
}

/// Display text of the WebSocket protocol's closed-connection errors.
const CLOSED_CONNECTION: [&str; 2] = [
    "Connection closed normally",
    "Trying to work with closed connection",
];

/// Map a WebSocket send failure onto the sink taxonomy.
///
/// Closed-connection errors and transport resets mean the client is gone.
/// Everything else (capacity, protocol, other I/O) is a sink fault.
pub fn classify_send_error(err: axum::Error) -> SinkError {
    let inner = err.into_inner();
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&*inner);

    while let Some(e) = source {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return match io_err.kind() {
                io::ErrorKind::BrokenPipe
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::UnexpectedEof => SinkError::Disconnected,
                _ => SinkError::Failed(io_err.to_string()),
            };
        }
        if CLOSED_CONNECTION.contains(&e.to_string().as_str()) {
            return SinkError::Disconnected;
        }
        source = e.source();
    }

    SinkError::Failed(inner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::router::create_router;
    use axum::{Router, routing::get};
    use clap::Parser;
    use futures::StreamExt;
    use grid_replay::codec;
    use std::net::SocketAddr;
    use tempfile::TempDir;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::{self, error::CapacityError};

    #[test]
    fn test_broken_pipe_is_disconnect() {
        let err = axum::Error::new(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
        assert_eq!(classify_send_error(err), SinkError::Disconnected);
    }

    #[test]
    fn test_connection_reset_is_disconnect() {
        let err = axum::Error::new(io::Error::from(io::ErrorKind::ConnectionReset));
        assert_eq!(classify_send_error(err), SinkError::Disconnected);
    }

    #[test]
    fn test_closed_connection_is_disconnect() {
        let err = axum::Error::new(tungstenite::Error::AlreadyClosed);
        assert_eq!(classify_send_error(err), SinkError::Disconnected);

        let err = axum::Error::new(tungstenite::Error::ConnectionClosed);
        assert_eq!(classify_send_error(err), SinkError::Disconnected);
    }

    #[test]
    fn test_wrapped_io_reset_is_disconnect() {
        let err = axum::Error::new(tungstenite::Error::Io(io::Error::from(
            io::ErrorKind::ConnectionReset,
        )));
        assert_eq!(classify_send_error(err), SinkError::Disconnected);
    }

    #[test]
    fn test_capacity_error_is_failure() {
        let err = axum::Error::new(tungstenite::Error::Capacity(
            CapacityError::MessageTooLong {
                size: 99,
                max_size: 10,
            },
        ));
        assert_eq!(
            classify_send_error(err),
            SinkError::Failed("Space limit exceeded: Message too long: 99 > 10".to_string())
        );
    }

    #[test]
    fn test_other_io_error_is_failure() {
        let err = axum::Error::new(io::Error::new(io::ErrorKind::OutOfMemory, "no buffer space"));
        assert_eq!(
            classify_send_error(err),
            SinkError::Failed("no buffer space".to_string())
        );
    }

    async fn serve(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    #[tokio::test]
    async fn test_stream_over_websocket() {
        let dir = TempDir::new().unwrap();
        let config = Config::try_parse_from([
            "gateway",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--pacing-interval-ms",
            "1",
        ])
        .unwrap();
        let datasets = config.dataset_paths();
        std::fs::write(&datasets.all_jobs, r#"{"5": {"jobs_pending": 150}}"#).unwrap();
        std::fs::write(
            &datasets.rl_min_instability,
            r#"{"5": {"trace_it_power_mw": 20.0}}"#,
        )
        .unwrap();

        let addr = serve(create_router(AppState::new(&config))).await;
        let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/stream"))
            .await
            .unwrap();

        let mut frames = Vec::new();
        let closed = loop {
            match client.next().await {
                Some(Ok(tungstenite::Message::Binary(data))) => frames.push(data),
                Some(Ok(tungstenite::Message::Close(_))) => break true,
                Some(Ok(other)) => panic!("unexpected message: {other:?}"),
                Some(Err(e)) => panic!("socket error: {e}"),
                None => break false,
            }
        };
        assert!(closed, "server did not send a close frame");
        assert_eq!(frames.len(), 3);

        let first: serde_json::Value = codec::decode(&frames[0]).unwrap();
        assert_eq!(first["timestep"], 5);
        assert_eq!(first["source"], "all_jobs");
        assert_eq!(first["power_queue"], 0.5);

        let second: serde_json::Value = codec::decode(&frames[1]).unwrap();
        assert_eq!(second["source"], "rl_min_instability");
        assert_eq!(second["power_exec"], 1.0);

        assert!(codec::is_completion(&frames[2]));
    }

    #[tokio::test]
    async fn test_sink_refuses_frames_after_close() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/sink",
            get(move |ws: WebSocketUpgrade| {
                let tx = tx.clone();
                async move {
                    ws.on_upgrade(move |socket| async move {
                        let mut sink = WebSocketSink::new(socket);
                        let first = sink.close().await;
                        let second = sink.close().await;
                        let after = sink.send_frame(vec![0xc0]).await;
                        let _ = tx.send((first, second, after));
                    })
                }
            }),
        );

        let addr = serve(app).await;
        let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/sink"))
            .await
            .unwrap();

        assert!(matches!(
            client.next().await,
            Some(Ok(tungstenite::Message::Close(_)))
        ));
        let (first, second, after) = rx.recv().await.unwrap();
        assert_eq!(first, Ok(()));
        assert_eq!(second, Ok(()));
        assert_eq!(after, Err(SinkError::Disconnected));
    }
}
