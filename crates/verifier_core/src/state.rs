use verifier_logging::{set_session, verifier_debug, verifier_info};

use crate::codec::{DomainInfo, SearchResult};
use crate::dispatch::{Dispatch, UiMutation};
use crate::phase::Phase;
use crate::view_model::{AppViewModel, ConclusionView, DomainBadgesView};
use crate::RegionRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleTab {
    #[default]
    Summary,
    Article,
}

/// One row of the sources list, numbered in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub number: usize,
    pub url: String,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    session: SessionState,
    session_id: u64,
    input: String,
    input_enabled: bool,
    regions: RegionRegistry,
    status: &'static str,
    phase: Phase,
    domain: DomainInfo,
    summary_html: String,
    article_html: String,
    active_tab: ArticleTab,
    summary_expanded: bool,
    sources: Vec<SourceEntry>,
    conclusion: Option<ConclusionView>,
    last_alert: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: SessionState::Idle,
            session_id: 0,
            input: String::new(),
            input_enabled: true,
            regions: RegionRegistry::new(),
            status: "",
            phase: Phase::Connecting,
            domain: DomainInfo::default(),
            summary_html: String::new(),
            article_html: String::new(),
            active_tab: ArticleTab::Summary,
            summary_expanded: false,
            sources: Vec::new(),
            conclusion: None,
            last_alert: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let tab_html = match self.active_tab {
            ArticleTab::Summary => self.summary_html.clone(),
            ArticleTab::Article => self.article_html.clone(),
        };
        AppViewModel {
            session: self.session,
            session_id: self.session_id,
            input: self.input.clone(),
            input_enabled: self.input_enabled,
            status_text: self.status.to_string(),
            progress: self.phase.progress(),
            regions: self.regions.iter().collect(),
            domain: DomainBadgesView {
                ip: self.domain.ip.clone(),
                location: self.domain.location(),
                domain: self.domain.domain.clone(),
            },
            active_tab: self.active_tab,
            tab_html,
            summary_expanded: self.summary_expanded,
            expand_label: if self.summary_expanded {
                "Collapse"
            } else {
                "Expand"
            },
            sources: self.sources.clone(),
            conclusion: self.conclusion.clone(),
            last_alert: self.last_alert.clone(),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn regions(&self) -> &RegionRegistry {
        &self.regions
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn reject_input(&mut self, message: String) {
        self.input.clear();
        self.last_alert = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn raise_alert(&mut self, message: String) {
        self.last_alert = Some(message);
        self.mark_dirty();
    }

    /// Reset everything the previous run left behind and enter `Running`.
    pub(crate) fn start_session(&mut self) {
        self.session_id += 1;
        set_session(self.session_id);
        verifier_info!("Starting session");

        self.session = SessionState::Running;
        self.input_enabled = false;
        self.regions.begin_run();
        self.status = Phase::Connecting.status_text();
        self.phase = Phase::Connecting;
        self.domain = DomainInfo::default();
        self.summary_html.clear();
        self.article_html.clear();
        self.active_tab = ArticleTab::Summary;
        self.summary_expanded = false;
        self.sources.clear();
        self.conclusion = None;
        self.last_alert = None;
        self.mark_dirty();
    }

    /// Leave `Running` for `outcome`. Returns `false` if no session was running.
    pub(crate) fn end_session(&mut self, outcome: SessionState) -> bool {
        if self.session != SessionState::Running {
            verifier_debug!("End of session ({:?}) ignored in {:?}", outcome, self.session);
            return false;
        }
        verifier_info!("Session ended: {:?}", outcome);
        self.session = outcome;
        self.input_enabled = true;
        self.regions.stop_loading_all();
        self.mark_dirty();
        true
    }

    /// Apply a phase dispatch. Returns the alerts it raised.
    pub(crate) fn apply_dispatch(&mut self, dispatch: Dispatch) -> Vec<String> {
        if let Some(status) = dispatch.status {
            self.status = status;
        }
        if let Some(phase) = dispatch.phase {
            self.phase = phase;
        }
        self.mark_dirty();

        let mut alerts = Vec::new();
        for mutation in dispatch.mutations {
            match mutation {
                UiMutation::SetDomainBadges(info) => self.domain = info,
                UiMutation::SetArticleBodies {
                    summary_html,
                    article_html,
                } => {
                    self.summary_html = summary_html;
                    self.article_html = article_html;
                    self.active_tab = ArticleTab::Summary;
                }
                UiMutation::AppendSources(results) => {
                    let added = self.append_sources(results);
                    verifier_debug!("Sources appended: {}, listed: {}", added, self.sources.len());
                }
                UiMutation::SetConclusion {
                    verdict,
                    annotation,
                    conclusion_html,
                    bars,
                } => {
                    self.conclusion = Some(ConclusionView {
                        verdict,
                        annotation,
                        conclusion_html,
                        bars,
                    });
                }
                UiMutation::Show(id) => self.regions.show(id),
                UiMutation::Reveal(id) => {
                    self.regions.reveal(id);
                }
                UiMutation::Alert(message) => {
                    self.last_alert = Some(message.clone());
                    alerts.push(message);
                }
                UiMutation::FinishSession => {
                    self.end_session(SessionState::Finished);
                }
                UiMutation::AbortSession => {
                    self.end_session(SessionState::Aborted);
                }
            }
        }
        alerts
    }

    /// Append results whose URL is not listed yet. Returns how many were added.
    fn append_sources(&mut self, results: Vec<SearchResult>) -> usize {
        let mut added = 0;
        for result in results {
            if self.sources.iter().any(|entry| entry.url == result.url) {
                continue;
            }
            self.sources.push(SourceEntry {
                number: self.sources.len() + 1,
                url: result.url,
                title: result.title,
                summary: result.summary,
            });
            added += 1;
        }
        added
    }

    pub(crate) fn toggle_tab(&mut self) {
        self.active_tab = match self.active_tab {
            ArticleTab::Summary => ArticleTab::Article,
            ArticleTab::Article => ArticleTab::Summary,
        };
        self.mark_dirty();
    }

    pub(crate) fn toggle_expanded(&mut self) {
        self.summary_expanded = !self.summary_expanded;
        self.mark_dirty();
    }
}
