#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// User pressed the search button.
    SearchClicked,
    /// The channel to the server is open.
    ChannelOpened,
    /// Raw text frame from the server.
    FrameReceived(String),
    /// Transport-level failure on the channel.
    ChannelFailed(String),
    /// The channel closed, by either side.
    ChannelClosed,
    /// User switched between the summary and full-article tabs.
    TabToggled,
    /// User expanded or collapsed the summary panel.
    ExpandToggled,
}
