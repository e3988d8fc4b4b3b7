use verifier_logging::{verifier_debug, verifier_info, verifier_warn};

use crate::{decode, dispatch, validate_url, AppState, Effect, Msg, SessionState};

const DISCONNECTED_NOTICE: &str = "Server disconnected.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SearchClicked => submit(&mut state),
        Msg::ChannelOpened => {
            verifier_info!("Channel open");
            Vec::new()
        }
        Msg::FrameReceived(raw) => handle_frame(&mut state, &raw),
        Msg::ChannelFailed(reason) => {
            abort_on_transport(&mut state, format!("Connection error: {reason}"))
        }
        Msg::ChannelClosed => abort_on_transport(&mut state, DISCONNECTED_NOTICE.to_string()),
        Msg::TabToggled => {
            state.toggle_tab();
            Vec::new()
        }
        Msg::ExpandToggled => {
            state.toggle_expanded();
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if !state.input_enabled() {
        verifier_debug!("Search ignored while a session is running");
        return Vec::new();
    }

    match validate_url(state.input()) {
        Ok(url) => {
            state.start_session();
            verifier_info!("Sending URL to backend: {}", url);
            vec![Effect::OpenChannel, Effect::SendRequest { url }]
        }
        Err(err) => {
            let message = err.to_string();
            state.reject_input(message.clone());
            vec![Effect::ShowAlert { message }]
        }
    }
}

fn handle_frame(state: &mut AppState, raw: &str) -> Vec<Effect> {
    if state.session() != SessionState::Running {
        verifier_debug!("Dropping frame received outside a session");
        return Vec::new();
    }

    let message = match decode(raw) {
        Ok(message) => message,
        Err(err) => {
            verifier_warn!("Failed to parse message: {}", err);
            return Vec::new();
        }
    };

    state
        .apply_dispatch(dispatch(&message))
        .into_iter()
        .map(|message| Effect::ShowAlert { message })
        .collect()
}

/// Transport failures end the running session. Later failures on the same
/// session are no-ops, so an error followed by a close aborts once.
fn abort_on_transport(state: &mut AppState, notice: String) -> Vec<Effect> {
    if !state.end_session(SessionState::Aborted) {
        return Vec::new();
    }
    state.raise_alert(notice.clone());
    vec![Effect::ShowAlert { message: notice }]
}
