use pretty_assertions::assert_eq;
use verifier_core::{
    annotation, dispatch, result_bars, ConclusionReport, Phase, PhaseMessage, RegionId,
    ResultBars, ServerSignal, UiMutation, Verdict, PHASE_COUNT, UNKNOWN_STATUS,
};

fn canonical_message(phase: Phase) -> PhaseMessage {
    match phase {
        Phase::CheckDomain => PhaseMessage::CheckDomain(Default::default()),
        Phase::ProcessArticle => PhaseMessage::ProcessArticle(Default::default()),
        Phase::ProcessSearch => PhaseMessage::ProcessSearch(Vec::new()),
        Phase::DrawConclusion => PhaseMessage::DrawConclusion(Default::default()),
        Phase::LastChecks => PhaseMessage::LastChecks(Default::default()),
        Phase::Finished => PhaseMessage::Finished,
        other => PhaseMessage::Progress(other),
    }
}

#[test]
fn ordinals_strictly_increase_in_canonical_order() {
    let ordinals: Vec<u8> = Phase::ALL
        .into_iter()
        .skip(1)
        .map(|phase| dispatch(&canonical_message(phase)).ordinal().unwrap())
        .collect();

    assert_eq!(ordinals, (1..=PHASE_COUNT).collect::<Vec<_>>());
    assert_eq!(Phase::Connecting.ordinal(), 0);
    assert_eq!(Phase::Finished.progress(), 1.0);
}

#[test]
fn status_text_is_deterministic_and_distinct() {
    let first: Vec<_> = Phase::ALL
        .into_iter()
        .map(|phase| dispatch(&canonical_message(phase)).status.unwrap())
        .collect();
    let second: Vec<_> = Phase::ALL
        .into_iter()
        .map(|phase| dispatch(&canonical_message(phase)).status.unwrap())
        .collect();
    assert_eq!(first, second);

    let mut unique = first.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), first.len());
    assert!(!first.contains(&UNKNOWN_STATUS));
}

#[test]
fn wire_names_round_trip_through_lookup() {
    for phase in Phase::ALL {
        assert_eq!(Phase::from_wire(phase.wire_name()), Some(phase));
    }
    assert_eq!(Phase::from_wire("Finished"), None);
}

#[test]
fn unknown_phase_only_sets_status() {
    let out = dispatch(&PhaseMessage::Unknown("teleport".to_string()));
    assert_eq!(out.status, Some(UNKNOWN_STATUS));
    assert_eq!(out.ordinal(), None);
    assert!(out.mutations.is_empty());
}

#[test]
fn server_error_alerts_then_aborts_without_progress() {
    let out = dispatch(&PhaseMessage::ServerError(ServerSignal {
        refusal: Some("Not a news article.".to_string()),
        ..ServerSignal::default()
    }));
    assert_eq!(out.status, None);
    assert_eq!(out.ordinal(), None);
    assert_eq!(
        out.mutations,
        vec![
            UiMutation::Alert("Not a news article.".to_string()),
            UiMutation::AbortSession,
        ]
    );
}

#[test]
fn verified_conclusion_uses_verified_share() {
    let out = dispatch(&PhaseMessage::DrawConclusion(ConclusionReport {
        verified: true,
        verified_percentage: 87.0,
        unverified_percentage: 10.0,
        unrelated_percentage: 3.0,
        conclusion: "[1] [3] Several outlets confirm the story.".to_string(),
    }));

    let Some(UiMutation::SetConclusion {
        verdict,
        annotation,
        conclusion_html,
        bars,
    }) = out.mutations.first()
    else {
        panic!("expected a conclusion mutation first");
    };
    assert_eq!(*verdict, Verdict::Verified);
    assert_eq!(verdict.label(), "verified");
    assert!(annotation.starts_with("87% "));
    assert_eq!(conclusion_html, "<p>Several outlets confirm the story.</p>\n");
    assert_eq!(bars.verified, 0.87);
    assert_eq!(bars.unrelated, 0.03);

    assert_eq!(
        &out.mutations[1..],
        &[
            UiMutation::Show(RegionId::ConclusionCard),
            UiMutation::Reveal(RegionId::ConclusionMarkdown),
            UiMutation::Reveal(RegionId::ResultsSection),
        ]
    );
}

#[test]
fn unverified_annotation_folds_unrelated_into_unverified() {
    let bars = ResultBars {
        verified: 0.5,
        unverified: 0.4,
        unrelated: 0.1,
    };
    let text = annotation(Verdict::Unverified, &bars);
    assert!(text.starts_with("50% "), "{text}");
    assert_eq!(Verdict::from_verified(false).label(), "unverified");
}

fn report(verified: f64, unverified: f64, unrelated: f64) -> ConclusionReport {
    ConclusionReport {
        verified_percentage: verified,
        unverified_percentage: unverified,
        unrelated_percentage: unrelated,
        ..Default::default()
    }
}

#[test]
fn wire_fractions_and_percents_agree() {
    let expected = ResultBars {
        verified: 0.25,
        unverified: 0.5,
        unrelated: 0.25,
    };
    assert_eq!(result_bars(&report(0.25, 0.5, 0.25)), expected);
    assert_eq!(result_bars(&report(25.0, 50.0, 25.0)), expected);
    assert_eq!(
        result_bars(&report(1.0, 0.0, 0.0)),
        ResultBars {
            verified: 1.0,
            ..Default::default()
        }
    );
    assert_eq!(
        result_bars(&report(250.0, -3.0, 0.0)),
        ResultBars {
            verified: 1.0,
            ..Default::default()
        }
    );
}

#[test]
fn percent_scale_applies_to_every_field_of_a_report() {
    let out = dispatch(&PhaseMessage::DrawConclusion(report(50.0, 1.0, 49.0)));
    let UiMutation::SetConclusion {
        annotation, bars, ..
    } = &out.mutations[0]
    else {
        panic!("expected a conclusion mutation first");
    };

    assert_eq!(
        *bars,
        ResultBars {
            verified: 0.5,
            unverified: 0.01,
            unrelated: 0.49,
        }
    );
    assert!(annotation.starts_with("50% "), "{annotation}");
}

#[test]
fn last_checks_show_only_raised_badges() {
    let out = dispatch(&PhaseMessage::LastChecks(verifier_core::ArticleChecks {
        has_bad_reputation: true,
        grammar: true,
        ..Default::default()
    }));
    assert_eq!(
        out.mutations,
        vec![
            UiMutation::Show(RegionId::ReputationBadge),
            UiMutation::Show(RegionId::GrammarBadge),
            UiMutation::Reveal(RegionId::ArticleBadges),
            UiMutation::Reveal(RegionId::ExtraBadges),
        ]
    );
}

#[test]
fn empty_search_batch_does_not_reveal_sources() {
    let out = dispatch(&PhaseMessage::ProcessSearch(Vec::new()));
    assert_eq!(out.mutations, vec![UiMutation::AppendSources(Vec::new())]);
}
