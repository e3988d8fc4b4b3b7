use std::fmt;

use thiserror::Error;

/// Lifecycle of the channel. There is never more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Connecting,
    Open,
}

impl ChannelState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            ChannelState::Closed => 0,
            ChannelState::Connecting => 1,
            ChannelState::Open => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => ChannelState::Connecting,
            2 => ChannelState::Open,
            _ => ChannelState::Closed,
        }
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelState::Closed => write!(f, "closed"),
            ChannelState::Connecting => write!(f, "connecting"),
            ChannelState::Open => write!(f, "open"),
        }
    }
}

/// What the channel reports back, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened,
    Frame(String),
    Error(String),
    Closed,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to start channel runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("channel worker has stopped")]
    WorkerGone,
}
