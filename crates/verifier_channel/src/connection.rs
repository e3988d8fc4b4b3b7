use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc;
use url::Url;
use verifier_logging::{verifier_debug, verifier_warn};

use crate::worker::{Command, Worker};
use crate::{ChannelError, ChannelEvent, ChannelState};

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000/ws";

#[derive(Debug, Clone)]
pub struct ChannelSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Receives channel events on the worker thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ChannelEvent);
}

/// Owns the one channel to the server.
///
/// The socket lives on a background thread with its own runtime; this handle
/// only queues commands, so none of its methods block. Commands run in the
/// order they were queued, and events reach the sink in delivery order.
pub struct ConnectionManager {
    commands: mpsc::UnboundedSender<Command>,
    state: Arc<AtomicU8>,
    endpoint: String,
}

impl ConnectionManager {
    pub fn new(settings: ChannelSettings, sink: Arc<dyn EventSink>) -> Result<Self, ChannelError> {
        validate_endpoint(&settings.endpoint)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let state = Arc::new(AtomicU8::new(ChannelState::Closed.as_u8()));
        let endpoint = settings.endpoint.clone();
        let worker = Worker::new(settings, sink, state.clone());

        thread::Builder::new()
            .name("verifier-channel".to_string())
            .spawn(move || runtime.block_on(worker.run(cmd_rx)))?;

        Ok(Self {
            commands: cmd_tx,
            state,
            endpoint,
        })
    }

    /// Open the channel. A no-op when it is already open or opening.
    pub fn connect(&self) -> Result<(), ChannelError> {
        match self.state() {
            ChannelState::Open | ChannelState::Connecting => {
                verifier_debug!("Channel already {}", self.state());
                Ok(())
            }
            ChannelState::Closed => self.queue(Command::Connect),
        }
    }

    /// Send a text payload, or hold it until the next open if not open yet.
    pub fn send(&self, payload: impl Into<String>) -> Result<(), ChannelError> {
        self.queue(Command::Send(payload.into()))
    }

    pub fn close(&self) -> Result<(), ChannelError> {
        self.queue(Command::Close)
    }

    pub fn state(&self) -> ChannelState {
        ChannelState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn queue(&self, command: Command) -> Result<(), ChannelError> {
        self.commands.send(command).map_err(|_| {
            verifier_warn!("Channel worker is gone; command dropped");
            ChannelError::WorkerGone
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ChannelError> {
    let invalid = |reason: String| ChannelError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let url = Url::parse(endpoint).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "ws" | "wss" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}
