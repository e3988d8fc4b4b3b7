//! Phase dispatch: turns a decoded frame into a status line, a progress
//! ordinal and the UI mutations it implies.
//!
//! Every mutation is safe to apply twice. Dispatch itself is pure apart from
//! logging; `AppState` applies the result.

use verifier_logging::{verifier_error, verifier_info, verifier_warn};

use crate::codec::{ArticleChecks, ConclusionReport, DomainInfo, PhaseMessage, SearchResult};
use crate::markdown::{render_markdown, strip_citation_markers};
use crate::view_model::ResultBars;
use crate::{Phase, RegionId, UNKNOWN_STATUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    Unverified,
}

impl Verdict {
    pub fn from_verified(verified: bool) -> Self {
        if verified {
            Verdict::Verified
        } else {
            Verdict::Unverified
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Verified => "verified",
            Verdict::Unverified => "unverified",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Verdict::Verified => "The article contains corroborated information.",
            Verdict::Unverified => {
                "The article contains contradictory or uncorroborated information."
            }
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Verdict::Verified => "green",
            Verdict::Unverified => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiMutation {
    SetDomainBadges(DomainInfo),
    SetArticleBodies {
        summary_html: String,
        article_html: String,
    },
    /// Append entries whose URL is not listed yet.
    AppendSources(Vec<SearchResult>),
    SetConclusion {
        verdict: Verdict,
        annotation: String,
        conclusion_html: String,
        bars: ResultBars,
    },
    Show(RegionId),
    Reveal(RegionId),
    Alert(String),
    FinishSession,
    AbortSession,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dispatch {
    /// New status line; `None` leaves it as is.
    pub status: Option<&'static str>,
    /// Phase the progress bar moves to; `None` leaves it where it is.
    pub phase: Option<Phase>,
    pub mutations: Vec<UiMutation>,
}

impl Dispatch {
    pub fn ordinal(&self) -> Option<u8> {
        self.phase.map(Phase::ordinal)
    }
}

pub fn dispatch(message: &PhaseMessage) -> Dispatch {
    let mut out = match message.phase() {
        Some(phase) => {
            verifier_info!(
                "Phase {}: {} ({})",
                phase.ordinal(),
                phase.wire_name(),
                phase.status_text()
            );
            Dispatch {
                status: Some(phase.status_text()),
                phase: Some(phase),
                mutations: Vec::new(),
            }
        }
        None => Dispatch::default(),
    };

    match message {
        PhaseMessage::CheckDomain(info) => {
            out.mutations.push(UiMutation::SetDomainBadges(info.clone()));
            out.mutations.push(UiMutation::Reveal(RegionId::DomainBadges));
        }
        PhaseMessage::ProcessArticle(bodies) => {
            out.mutations.push(UiMutation::SetArticleBodies {
                summary_html: render_markdown(&bodies.summary),
                article_html: render_markdown(&bodies.markdown),
            });
            out.mutations.push(UiMutation::Reveal(RegionId::SummaryContainer));
        }
        PhaseMessage::ProcessSearch(results) => dispatch_search(results, &mut out.mutations),
        PhaseMessage::DrawConclusion(report) => dispatch_conclusion(report, &mut out.mutations),
        PhaseMessage::LastChecks(checks) => dispatch_last_checks(checks, &mut out.mutations),
        PhaseMessage::Finished => out.mutations.push(UiMutation::FinishSession),
        PhaseMessage::Progress(_) => {}
        PhaseMessage::Unknown(name) => {
            verifier_warn!("Unknown phase: {:?}", name);
            out.status = Some(UNKNOWN_STATUS);
        }
        PhaseMessage::ServerError(signal) => {
            if let Some(error) = &signal.error {
                verifier_error!("Error received: {}", error);
            }
            if let Some(refusal) = &signal.refusal {
                verifier_error!("Refusal received: {}", refusal);
            }
            if let Some(exception) = &signal.exception {
                verifier_error!("Server exception: {}", exception);
            }
            out.mutations.push(UiMutation::Alert(signal.user_message()));
            out.mutations.push(UiMutation::AbortSession);
        }
    }
    out
}

fn dispatch_search(results: &[SearchResult], mutations: &mut Vec<UiMutation>) {
    mutations.push(UiMutation::AppendSources(results.to_vec()));
    if !results.is_empty() {
        mutations.push(UiMutation::Reveal(RegionId::SourcesContainer));
    }
}

fn dispatch_conclusion(report: &ConclusionReport, mutations: &mut Vec<UiMutation>) {
    let verdict = Verdict::from_verified(report.verified);
    let bars = result_bars(report);
    let conclusion_html = strip_citation_markers(&render_markdown(&report.conclusion));

    mutations.push(UiMutation::SetConclusion {
        verdict,
        annotation: annotation(verdict, &bars),
        conclusion_html,
        bars,
    });
    mutations.push(UiMutation::Show(RegionId::ConclusionCard));
    mutations.push(UiMutation::Reveal(RegionId::ConclusionMarkdown));
    mutations.push(UiMutation::Reveal(RegionId::ResultsSection));
}

fn dispatch_last_checks(checks: &ArticleChecks, mutations: &mut Vec<UiMutation>) {
    let badges = [
        (checks.has_bad_reputation, RegionId::ReputationBadge),
        (checks.noauthor, RegionId::NoAuthorBadge),
        (checks.nosource, RegionId::NoSourcesBadge),
        (checks.recent, RegionId::RecentBadge),
        (checks.grammar, RegionId::GrammarBadge),
    ];
    mutations.extend(
        badges
            .into_iter()
            .filter(|(raised, _)| *raised)
            .map(|(_, badge)| UiMutation::Show(badge)),
    );
    mutations.push(UiMutation::Reveal(RegionId::ArticleBadges));
    mutations.push(UiMutation::Reveal(RegionId::ExtraBadges));
}

/// Normalise the three wire percentages to fractions in `[0, 1]`.
///
/// The scale is decided once per report: if any value is above 1 all three
/// are percents, otherwise all three are already fractions.
pub fn result_bars(report: &ConclusionReport) -> ResultBars {
    let values = [
        report.verified_percentage,
        report.unverified_percentage,
        report.unrelated_percentage,
    ];
    let divisor = if values.iter().any(|value| *value > 1.0) {
        100.0
    } else {
        1.0
    };
    let [verified, unverified, unrelated] = values.map(|value| (value / divisor).clamp(0.0, 1.0));
    ResultBars {
        verified,
        unverified,
        unrelated,
    }
}

/// User-facing explanation of the verdict.
///
/// The unverified share folds unrelated results into unverified ones.
pub fn annotation(verdict: Verdict, bars: &ResultBars) -> String {
    let share = match verdict {
        Verdict::Verified => bars.verified,
        Verdict::Unverified => bars.unverified + bars.unrelated,
    };
    let percent = whole_percent(share);
    match verdict {
        Verdict::Verified => format!(
            "{percent}% of the results found verify the information in the article. \
             Most of the facts it describes have been checked and are backed by other outlets."
        ),
        Verdict::Unverified => format!(
            "{percent}% of the results contradict or fail to verify the article. \
             It may contain altered or publicly unknown information, so read it with caution."
        ),
    }
}

pub fn whole_percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}
