pub const APP_TITLE: &str = "News Verifier";

pub const QUIT_COMMAND: &str = ":quit";
pub const TAB_COMMAND: &str = ":tab";
pub const EXPAND_COMMAND: &str = ":expand";

pub const FRAME_WIDTH: usize = 72;
pub const PROGRESS_WIDTH: usize = 40;
pub const BAR_WIDTH: usize = 30;
/// Lines of the active tab shown while the summary panel is collapsed.
pub const COLLAPSED_LINES: usize = 6;

pub const LOADING_PLACEHOLDER: &str = "(loading...)";
pub const BLURRED_PLACEHOLDER: &str = "(waiting for data)";
