//! Visibility state of the named UI regions.
//!
//! A region carries three independent flags. During a run, `loading` and
//! `blurred` are cleared at most once per region (on the first data for it)
//! and are only set again by the next `begin_run`.

use std::collections::BTreeMap;

use verifier_logging::verifier_debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionId {
    PhaseProgress,
    MainContainer,
    SummaryContainer,
    ConclusionCard,
    ConclusionMarkdown,
    ResultsSection,
    DomainBadges,
    IpBadge,
    LocationBadge,
    DomainBadge,
    ReputationBadge,
    ArticleBadges,
    NoAuthorBadge,
    NoSourcesBadge,
    ExtraBadges,
    RecentBadge,
    GrammarBadge,
    SourcesContainer,
}

impl RegionId {
    pub const ALL: [RegionId; 18] = [
        RegionId::PhaseProgress,
        RegionId::MainContainer,
        RegionId::SummaryContainer,
        RegionId::ConclusionCard,
        RegionId::ConclusionMarkdown,
        RegionId::ResultsSection,
        RegionId::DomainBadges,
        RegionId::IpBadge,
        RegionId::LocationBadge,
        RegionId::DomainBadge,
        RegionId::ReputationBadge,
        RegionId::ArticleBadges,
        RegionId::NoAuthorBadge,
        RegionId::NoSourcesBadge,
        RegionId::ExtraBadges,
        RegionId::RecentBadge,
        RegionId::GrammarBadge,
        RegionId::SourcesContainer,
    ];

    /// Regions made visible when a run starts.
    const UNHIDDEN_AT_START: [RegionId; 2] = [RegionId::PhaseProgress, RegionId::MainContainer];

    /// Regions that show a loading indicator until their data arrives.
    const LOADING_AT_START: [RegionId; 8] = [
        RegionId::PhaseProgress,
        RegionId::SummaryContainer,
        RegionId::ConclusionMarkdown,
        RegionId::ResultsSection,
        RegionId::DomainBadges,
        RegionId::ArticleBadges,
        RegionId::ExtraBadges,
        RegionId::SourcesContainer,
    ];

    /// Regions rendered blurred until their data arrives.
    const BLURRED_AT_START: [RegionId; 7] = [
        RegionId::SummaryContainer,
        RegionId::ConclusionMarkdown,
        RegionId::ResultsSection,
        RegionId::DomainBadges,
        RegionId::ArticleBadges,
        RegionId::ExtraBadges,
        RegionId::SourcesContainer,
    ];

    /// Badges shown by default at the start of a run.
    const BADGES_SHOWN_AT_START: [RegionId; 7] = [
        RegionId::IpBadge,
        RegionId::LocationBadge,
        RegionId::DomainBadge,
        RegionId::NoAuthorBadge,
        RegionId::NoSourcesBadge,
        RegionId::RecentBadge,
        RegionId::GrammarBadge,
    ];

    /// Stable key a render surface uses to find its target for this region.
    pub fn target_key(self) -> &'static str {
        match self {
            RegionId::PhaseProgress => "phase-progressbar",
            RegionId::MainContainer => "main-container",
            RegionId::SummaryContainer => "summary-container",
            RegionId::ConclusionCard => "conclusion-card",
            RegionId::ConclusionMarkdown => "conclusion-markdown",
            RegionId::ResultsSection => "results-section",
            RegionId::DomainBadges => "domain-badges",
            RegionId::IpBadge => "ip-badge",
            RegionId::LocationBadge => "location-badge",
            RegionId::DomainBadge => "domain-badge",
            RegionId::ReputationBadge => "reputation-badge",
            RegionId::ArticleBadges => "article-badges",
            RegionId::NoAuthorBadge => "noauthor-badge",
            RegionId::NoSourcesBadge => "nosources-badge",
            RegionId::ExtraBadges => "extra-badges",
            RegionId::RecentBadge => "recent-badge",
            RegionId::GrammarBadge => "grammar-badge",
            RegionId::SourcesContainer => "sources-container",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionFlags {
    pub hidden: bool,
    pub loading: bool,
    pub blurred: bool,
}

impl RegionFlags {
    /// Visible, with nothing pending.
    pub fn is_settled(&self) -> bool {
        !self.hidden && !self.loading && !self.blurred
    }
}

impl Default for RegionFlags {
    fn default() -> Self {
        Self {
            hidden: true,
            loading: false,
            blurred: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RegionSlot {
    flags: RegionFlags,
    revealed: bool,
}

/// Registry of every region, built once and owned by the app state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRegistry {
    slots: BTreeMap<RegionId, RegionSlot>,
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionRegistry {
    pub fn new() -> Self {
        let slots = RegionId::ALL
            .into_iter()
            .map(|id| (id, RegionSlot::default()))
            .collect();
        Self { slots }
    }

    pub fn flags(&self, id: RegionId) -> RegionFlags {
        self.slots
            .get(&id)
            .map(|slot| slot.flags)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, RegionFlags)> + '_ {
        self.slots.iter().map(|(id, slot)| (*id, slot.flags))
    }

    /// Put every region back into its start-of-run state.
    pub fn begin_run(&mut self) {
        for slot in self.slots.values_mut() {
            *slot = RegionSlot::default();
        }
        for id in RegionId::BLURRED_AT_START {
            self.slot_mut(id).flags.blurred = true;
        }
        for id in RegionId::LOADING_AT_START {
            self.slot_mut(id).flags.loading = true;
        }
        // Groups are visible so their blur and loading placeholders show.
        for id in RegionId::UNHIDDEN_AT_START
            .into_iter()
            .chain(RegionId::BLURRED_AT_START)
            .chain(RegionId::BADGES_SHOWN_AT_START)
        {
            self.slot_mut(id).flags.hidden = false;
        }
    }

    /// Clear `blurred` and `loading` the first time a region gets data.
    ///
    /// Returns `true` only for that first call within a run.
    pub fn reveal(&mut self, id: RegionId) -> bool {
        let slot = self.slot_mut(id);
        if slot.revealed {
            return false;
        }
        slot.revealed = true;
        slot.flags.blurred = false;
        slot.flags.loading = false;
        verifier_debug!("Revealed region {}", id.target_key());
        true
    }

    pub fn is_revealed(&self, id: RegionId) -> bool {
        self.slots.get(&id).is_some_and(|slot| slot.revealed)
    }

    pub fn show(&mut self, id: RegionId) {
        self.slot_mut(id).flags.hidden = false;
    }

    pub fn stop_loading_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.flags.loading = false;
        }
    }

    fn slot_mut(&mut self, id: RegionId) -> &mut RegionSlot {
        self.slots.entry(id).or_default()
    }
}
