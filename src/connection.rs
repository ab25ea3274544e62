//! # Connection Management Module
//!
//! Owns the single WebSocket connection to the inference backend. Outbound
//! frames arrive from the capture loop through a `FrameSink`; inbound
//! payloads and status changes go to the UI thread as `BackendUpdate`s.
//!
//! ## Key Components
//! - `ConnectionManager`: Runs the connection on its own thread and runtime
//! - `FrameSink`: Capture-side handle for offering frames
//! - `ConnectionHandle`: UI-side handle for closing the connection and
//!   joining its thread
//!
//! There is no reconnect. Once the socket closes, updates stop and the
//! capture loop keeps ticking against a closed sink.

use crate::error::ConnectionError;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::mpsc as frame_mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Frames the sink will hold while the socket is busy. Anything beyond is dropped.
const FRAME_QUEUE_DEPTH: usize = 1;

/// How long `close` waits for the close frame to go out before giving up on the thread
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Closed,
    Error(String),
}

#[derive(Debug)]
pub enum BackendUpdate {
    ConnectionStatus(ConnectionStatus),
    /// Raw inbound message, parsed by the dashboard
    Payload(String),
}

/// Hands encoded frames to the connection without ever blocking.
#[derive(Clone)]
pub struct FrameSink {
    sender: frame_mpsc::Sender<String>,
    open: Arc<AtomicBool>,
}

impl FrameSink {
    /// True only while the socket is connected
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Returns false if the frame was dropped
    pub fn offer(&self, frame: String) -> bool {
        self.sender.try_send(frame).is_ok()
    }
}

/// Closes the connection when asked or when dropped.
pub struct ConnectionHandle {
    should_stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ConnectionHandle {
    /// Ask the connection to close, then wait up to `CLOSE_TIMEOUT` for its thread.
    pub fn close(&mut self) {
        if !self.should_stop.swap(true, Ordering::Relaxed) {
            log::info!("Connection manager: Close requested");
        }

        let Some(worker) = self.worker.take() else {
            return;
        };
        let deadline = Instant::now() + CLOSE_TIMEOUT;
        while !worker.is_finished() {
            if Instant::now() >= deadline {
                log::warn!("Connection thread did not exit within {:?}", CLOSE_TIMEOUT);
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        if worker.join().is_err() {
            log::error!("Connection thread panicked");
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Manages the connection lifecycle for the inference backend.
///
/// Runs in a dedicated thread with its own Tokio runtime so the UI thread
/// never blocks on the network.
pub struct ConnectionManager {
    url: String,
    update_sender: mpsc::Sender<BackendUpdate>,
    frame_receiver: frame_mpsc::Receiver<String>,
    open: Arc<AtomicBool>,
    should_stop: Arc<AtomicBool>,
}

impl ConnectionManager {
    /// Creates a new ConnectionManager.
    ///
    /// Returns the manager, the sink for the capture loop, and the handle the
    /// UI uses to close the connection.
    pub fn new(
        url: impl Into<String>,
        update_sender: mpsc::Sender<BackendUpdate>,
    ) -> (Self, FrameSink, ConnectionHandle) {
        let (frame_sender, frame_receiver) = frame_mpsc::channel(FRAME_QUEUE_DEPTH);
        let open = Arc::new(AtomicBool::new(false));
        let should_stop = Arc::new(AtomicBool::new(false));

        let manager = ConnectionManager {
            url: url.into(),
            update_sender,
            frame_receiver,
            open: open.clone(),
            should_stop: should_stop.clone(),
        };
        let sink = FrameSink {
            sender: frame_sender,
            open,
        };
        let handle = ConnectionHandle {
            should_stop,
            worker: None,
        };

        (manager, sink, handle)
    }

    /// Runs a new manager for `url` on its own thread.
    ///
    /// The returned handle owns the thread and joins it on close.
    pub fn spawn(url: impl Into<String>, update_sender: mpsc::Sender<BackendUpdate>) -> (FrameSink, ConnectionHandle) {
        let (manager, sink, mut handle) = Self::new(url, update_sender);
        let worker = thread::Builder::new()
            .name("connection".to_string())
            .spawn(move || manager.run());

        match worker {
            Ok(worker) => handle.worker = Some(worker),
            Err(e) => log::error!("Failed to spawn connection thread: {}", e),
        }

        (sink, handle)
    }

    /// Connects and pumps messages until the socket closes or the handle asks to stop.
    ///
    /// Blocks; call it from a spawned thread.
    pub fn run(self) {
        let rt = match Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                let error = ConnectionError::RuntimeCreation(e.to_string());
                log::error!("{}", error);
                self.send_status(ConnectionStatus::Error(error.to_string()));
                return;
            }
        };

        rt.block_on(self.session());
    }

    fn send_status(&self, status: ConnectionStatus) {
        let _ = self.update_sender.send(BackendUpdate::ConnectionStatus(status));
    }

    async fn session(mut self) {
        log::info!("Connection manager: Connecting to {}", self.url);
        self.send_status(ConnectionStatus::Connecting);

        let stream = tokio::select! {
            result = tokio_tungstenite::connect_async(self.url.as_str()) => match result {
                Ok((stream, _response)) => stream,
                Err(e) => {
                    let error = ConnectionError::Handshake {
                        url: self.url.clone(),
                        reason: e.to_string(),
                    };
                    log::error!("{}", error);
                    self.send_status(ConnectionStatus::Error(error.to_string()));
                    return;
                }
            },
            _ = wait_for_stop(&self.should_stop) => {
                self.send_status(ConnectionStatus::Closed);
                return;
            }
        };

        self.open.store(true, Ordering::Release);
        log::info!("Connection manager: Connected");
        self.send_status(ConnectionStatus::Connected);

        let (mut outbound, mut inbound) = stream.split();

        loop {
            tokio::select! {
                frame = self.frame_receiver.recv() => match frame {
                    Some(frame) => {
                        if let Err(e) = outbound.send(WsMessage::Text(frame)).await {
                            log::error!("{}", ConnectionError::Transport(e.to_string()));
                        }
                    }
                    None => break,
                },
                message = inbound.next() => match message {
                    Some(Ok(WsMessage::Text(text))) => {
                        if self.update_sender.send(BackendUpdate::Payload(text)).is_err() {
                            log::debug!("Connection manager: UI receiver gone");
                            break;
                        }
                    }
                    Some(Ok(WsMessage::Binary(bytes))) => match String::from_utf8(bytes) {
                        Ok(text) => {
                            if self.update_sender.send(BackendUpdate::Payload(text)).is_err() {
                                break;
                            }
                        }
                        Err(e) => log::warn!("Ignoring non UTF-8 binary message: {}", e),
                    },
                    Some(Ok(WsMessage::Close(frame))) => {
                        log::info!("WebSocket connection closed: {:?}", frame);
                        break;
                    }
                    // ping/pong are answered by tungstenite
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::error!("{}", ConnectionError::Transport(e.to_string()));
                        break;
                    }
                    None => {
                        log::info!("WebSocket connection closed");
                        break;
                    }
                },
                _ = wait_for_stop(&self.should_stop) => {
                    log::info!("Connection manager: Closing connection");
                    if let Err(e) = outbound.send(WsMessage::Close(None)).await {
                        log::debug!("Close frame not sent: {}", e);
                    }
                    break;
                }
            }
        }

        self.open.store(false, Ordering::Release);
        self.send_status(ConnectionStatus::Closed);
    }
}

#[cfg(test)]
impl ConnectionManager {
    pub(crate) fn open_flag(&self) -> Arc<AtomicBool> {
        self.open.clone()
    }

    pub(crate) fn take_pending_frame(&mut self) -> Option<String> {
        self.frame_receiver.try_recv().ok()
    }
}

async fn wait_for_stop(should_stop: &AtomicBool) {
    while !should_stop.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_manager_creation() {
        let (update_sender, _update_receiver) = mpsc::channel();
        let (_manager, sink, mut handle) = ConnectionManager::new("ws://127.0.0.1:49078/ws", update_sender);

        assert!(!sink.is_open());
        handle.close();
        assert!(handle.should_stop.load(Ordering::Relaxed));
    }

    #[test]
    fn test_frame_sink_drops_when_full() {
        let (update_sender, _update_receiver) = mpsc::channel();
        let (mut manager, sink, _handle) = ConnectionManager::new("ws://127.0.0.1:49078/ws", update_sender);

        assert!(sink.offer("frame-1".to_string()));
        assert!(!sink.offer("frame-2".to_string()));

        assert_eq!(manager.take_pending_frame().as_deref(), Some("frame-1"));
        assert!(sink.offer("frame-3".to_string()));
    }

    #[test]
    fn test_dropping_handle_requests_close() {
        let (update_sender, _update_receiver) = mpsc::channel();
        let (manager, _sink, handle) = ConnectionManager::new("ws://127.0.0.1:49078/ws", update_sender);

        drop(handle);
        assert!(manager.should_stop.load(Ordering::Relaxed));
    }

    #[test]
    fn test_unreachable_backend_reports_error() {
        let (update_sender, update_receiver) = mpsc::channel();
        // port 1 on loopback refuses connections
        let (manager, sink, _handle) = ConnectionManager::new("ws://127.0.0.1:1/ws", update_sender);

        manager.run();

        let statuses: Vec<_> = update_receiver
            .try_iter()
            .filter_map(|update| match update {
                BackendUpdate::ConnectionStatus(status) => Some(status),
                BackendUpdate::Payload(_) => None,
            })
            .collect();
        assert_eq!(statuses.first(), Some(&ConnectionStatus::Connecting));
        assert!(matches!(statuses.last(), Some(ConnectionStatus::Error(_))));
        assert!(!sink.is_open());
    }

    #[test]
    fn test_close_joins_connection_thread() {
        // accepts TCP but never answers the WebSocket handshake
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let url = format!("ws://{}/ws", listener.local_addr().expect("No local addr"));

        let (update_sender, update_receiver) = mpsc::channel();
        let (sink, mut handle) = ConnectionManager::spawn(url, update_sender);
        std::thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        handle.close();

        assert!(started.elapsed() < CLOSE_TIMEOUT);
        assert!(handle.worker.is_none());
        assert!(!sink.is_open());
        let statuses: Vec<_> = update_receiver
            .try_iter()
            .filter_map(|update| match update {
                BackendUpdate::ConnectionStatus(status) => Some(status),
                BackendUpdate::Payload(_) => None,
            })
            .collect();
        assert_eq!(statuses.last(), Some(&ConnectionStatus::Closed));
        drop(listener);
    }
}
