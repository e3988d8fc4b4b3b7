//! Verifier channel: the single websocket connection to the analysis server.
mod connection;
mod types;
mod worker;

pub use connection::{ChannelSettings, ConnectionManager, EventSink, DEFAULT_ENDPOINT};
pub use types::{ChannelError, ChannelEvent, ChannelState};
