use std::collections::BTreeMap;

use crate::{ArticleTab, RegionFlags, RegionId, SessionState, SourceEntry, Verdict};

/// Result breakdown as fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResultBars {
    pub verified: f64,
    pub unverified: f64,
    pub unrelated: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainBadgesView {
    pub ip: String,
    pub location: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConclusionView {
    pub verdict: Verdict,
    pub annotation: String,
    pub conclusion_html: String,
    pub bars: ResultBars,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub session_id: u64,
    pub input: String,
    pub input_enabled: bool,
    pub status_text: String,
    /// Pipeline progress as a fraction in `[0, 1]`.
    pub progress: f64,
    pub regions: BTreeMap<RegionId, RegionFlags>,
    pub domain: DomainBadgesView,
    pub active_tab: ArticleTab,
    /// Rendered HTML of the active tab.
    pub tab_html: String,
    pub summary_expanded: bool,
    pub expand_label: &'static str,
    pub sources: Vec<SourceEntry>,
    pub conclusion: Option<ConclusionView>,
    pub last_alert: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn region(&self, id: RegionId) -> RegionFlags {
        self.regions.get(&id).copied().unwrap_or_default()
    }
}
