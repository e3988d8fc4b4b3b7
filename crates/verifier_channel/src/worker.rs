use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use verifier_logging::{verifier_debug, verifier_info, verifier_warn};

use crate::{ChannelEvent, ChannelSettings, ChannelState, EventSink};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub(crate) enum Command {
    Connect,
    Send(String),
    Close,
}

enum Wake {
    Command(Option<Command>),
    Frame(Option<Result<Message, WsError>>),
}

pub(crate) struct Worker {
    settings: ChannelSettings,
    sink: Arc<dyn EventSink>,
    state: Arc<AtomicU8>,
    socket: Option<Socket>,
    /// At most one send waiting for the channel to open.
    deferred: Option<String>,
}

impl Worker {
    pub(crate) fn new(
        settings: ChannelSettings,
        sink: Arc<dyn EventSink>,
        state: Arc<AtomicU8>,
    ) -> Self {
        Self {
            settings,
            sink,
            state,
            socket: None,
            deferred: None,
        }
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            let wake = match self.socket.as_mut() {
                None => Wake::Command(commands.recv().await),
                Some(socket) => tokio::select! {
                    command = commands.recv() => Wake::Command(command),
                    frame = socket.next() => Wake::Frame(frame),
                },
            };
            match wake {
                Wake::Command(Some(command)) => self.handle_command(command).await,
                Wake::Command(None) => break,
                Wake::Frame(frame) => self.handle_frame(frame),
            }
        }

        // Handle dropped: shut down quietly.
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None).await;
        }
        self.set_state(ChannelState::Closed);
        verifier_debug!("Channel worker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect => self.connect().await,
            Command::Send(payload) => self.send(payload).await,
            Command::Close => self.close().await,
        }
    }

    async fn connect(&mut self) {
        if self.socket.is_some() {
            verifier_debug!("WebSocket is already open.");
            return;
        }

        let endpoint = self.settings.endpoint.clone();
        verifier_info!("Starting WebSocket connection to {}", endpoint);
        self.set_state(ChannelState::Connecting);

        let attempt =
            tokio::time::timeout(self.settings.connect_timeout, connect_async(endpoint.as_str()))
                .await;
        match attempt {
            Ok(Ok((socket, _response))) => {
                self.socket = Some(socket);
                self.set_state(ChannelState::Open);
                verifier_info!("WebSocket connection established.");
                self.sink.emit(ChannelEvent::Opened);
                if let Some(payload) = self.deferred.take() {
                    verifier_debug!("WebSocket is now open, sending deferred message.");
                    self.send(payload).await;
                }
            }
            Ok(Err(err)) => self.fail_connect(format!("Failed to connect to {endpoint}: {err}")),
            Err(_) => self.fail_connect(format!(
                "Timed out connecting to {endpoint} after {:?}",
                self.settings.connect_timeout
            )),
        }
    }

    fn fail_connect(&mut self, reason: String) {
        verifier_warn!("{}", reason);
        if self.deferred.take().is_some() {
            verifier_debug!("Dropping deferred message; the channel never opened");
        }
        self.set_state(ChannelState::Closed);
        self.sink.emit(ChannelEvent::Error(reason));
        self.sink.emit(ChannelEvent::Closed);
    }

    async fn send(&mut self, payload: String) {
        let Some(socket) = self.socket.as_mut() else {
            if self.deferred.replace(payload).is_some() {
                verifier_warn!("Replacing a deferred message that was never sent");
            } else {
                verifier_debug!("Channel not open; message deferred until it opens");
            }
            return;
        };

        verifier_debug!("Sending {} bytes", payload.len());
        let sent = socket.send(Message::Text(payload)).await;
        if let Err(err) = sent {
            self.lose_socket(format!("Failed to send: {err}"));
        }
    }

    async fn close(&mut self) {
        let Some(mut socket) = self.socket.take() else {
            verifier_debug!("Close requested on a channel that is not open");
            return;
        };
        if let Err(err) = socket.close(None).await {
            verifier_debug!("Close handshake failed: {}", err);
        }
        self.set_state(ChannelState::Closed);
        verifier_info!("WebSocket connection closed.");
        self.sink.emit(ChannelEvent::Closed);
    }

    fn handle_frame(&mut self, frame: Option<Result<Message, WsError>>) {
        match frame {
            Some(Ok(Message::Text(text))) => self.sink.emit(ChannelEvent::Frame(text)),
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                Ok(text) => self.sink.emit(ChannelEvent::Frame(text)),
                Err(_) => verifier_warn!("Dropping non-UTF-8 binary frame"),
            },
            Some(Ok(Message::Close(close))) => {
                verifier_info!("Server closed the channel: {:?}", close);
                self.mark_closed();
            }
            // Ping and pong are answered by the protocol layer.
            Some(Ok(_)) => {}
            Some(Err(err)) => self.lose_socket(err.to_string()),
            None => {
                verifier_info!("WebSocket stream ended.");
                self.mark_closed();
            }
        }
    }

    fn lose_socket(&mut self, reason: String) {
        verifier_warn!("WebSocket error: {}", reason);
        self.socket = None;
        self.set_state(ChannelState::Closed);
        self.sink.emit(ChannelEvent::Error(reason));
        self.sink.emit(ChannelEvent::Closed);
    }

    fn mark_closed(&mut self) {
        self.socket = None;
        self.set_state(ChannelState::Closed);
        self.sink.emit(ChannelEvent::Closed);
    }

    fn set_state(&self, state: ChannelState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }
}
