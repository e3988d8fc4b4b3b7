use verifier_core::{update, AppState, Msg};

#[test]
fn channel_open_changes_nothing() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::ChannelOpened);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
