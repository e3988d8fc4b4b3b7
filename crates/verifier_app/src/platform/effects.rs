use std::sync::{mpsc, Arc};

use verifier_channel::{ChannelError, ChannelEvent, ChannelSettings, ConnectionManager, EventSink};
use verifier_core::{encode_request, Effect, Msg};
use verifier_logging::{verifier_debug, verifier_error, verifier_info};

use super::app::LoopEvent;
use super::ui;

/// Feeds channel events back into the controller loop.
struct MsgSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: ChannelEvent) {
        let msg = match event {
            ChannelEvent::Opened => Msg::ChannelOpened,
            ChannelEvent::Frame(text) => Msg::FrameReceived(text),
            ChannelEvent::Error(reason) => Msg::ChannelFailed(reason),
            ChannelEvent::Closed => Msg::ChannelClosed,
        };
        if self.tx.send(LoopEvent::Msg(msg)).is_err() {
            verifier_debug!("Controller loop is gone; channel event dropped");
        }
    }
}

pub(crate) struct EffectRunner {
    channel: ConnectionManager,
    msg_tx: mpsc::Sender<LoopEvent>,
    alerts: bool,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: ChannelSettings,
        msg_tx: mpsc::Sender<LoopEvent>,
        alerts: bool,
    ) -> Result<Self, ChannelError> {
        let sink = Arc::new(MsgSink { tx: msg_tx.clone() });
        let channel = ConnectionManager::new(settings, sink)?;
        verifier_info!("Channel endpoint: {}", channel.endpoint());
        Ok(Self {
            channel,
            msg_tx,
            alerts,
        })
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenChannel => {
                    let result = self.channel.connect();
                    self.report(result);
                }
                Effect::SendRequest { url } => match encode_request(&url) {
                    Ok(payload) => {
                        verifier_info!("SendRequest url_len={} url={}", url.len(), url);
                        let result = self.channel.send(payload);
                        self.report(result);
                    }
                    Err(err) => {
                        verifier_error!("Failed to encode request: {}", err);
                        self.fail(format!("Failed to encode request: {err}"));
                    }
                },
                Effect::ShowAlert { message } => self.show_alert(&message),
            }
        }
    }

    fn report(&self, result: Result<(), ChannelError>) {
        if let Err(err) = result {
            verifier_error!("Channel command failed: {}", err);
            self.fail(err.to_string());
        }
    }

    /// Route a local failure through the same abort path as a transport error.
    fn fail(&self, reason: String) {
        let _ = self.msg_tx.send(LoopEvent::Msg(Msg::ChannelFailed(reason)));
    }

    fn show_alert(&self, message: &str) {
        if self.alerts {
            println!("{}", ui::render::alert(message));
        } else {
            verifier_info!("Alert suppressed: {}", message);
        }
    }
}
