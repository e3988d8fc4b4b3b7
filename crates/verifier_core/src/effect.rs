#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the channel, or keep the one that is already open.
    OpenChannel,
    /// Send the search request once the channel is open.
    SendRequest { url: String },
    ShowAlert { message: String },
}
