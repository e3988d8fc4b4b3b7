//! Verifier core: pure state machine, phase dispatch and view-model helpers.
mod codec;
mod dispatch;
mod effect;
mod markdown;
mod msg;
mod phase;
mod regions;
mod state;
mod update;
mod validate;
mod view_model;

pub use codec::{
    decode, encode_request, ArticleBodies, ArticleChecks, ConclusionReport, DecodeError,
    DomainInfo, PhaseMessage, SearchRequest, SearchResult, ServerSignal,
};
pub use dispatch::{
    annotation, dispatch, result_bars, whole_percent, Dispatch, UiMutation, Verdict,
};
pub use effect::Effect;
pub use markdown::{render_markdown, strip_citation_markers};
pub use msg::Msg;
pub use phase::{Phase, PHASE_COUNT, UNKNOWN_STATUS};
pub use regions::{RegionFlags, RegionId, RegionRegistry};
pub use state::{AppState, ArticleTab, SessionState, SourceEntry};
pub use update::update;
pub use validate::{validate_url, ValidationError, MOCK_SENTINEL};
pub use view_model::{AppViewModel, ConclusionView, DomainBadgesView, ResultBars};
