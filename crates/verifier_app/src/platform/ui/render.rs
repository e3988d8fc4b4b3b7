use verifier_core::{whole_percent, AppViewModel, ArticleTab, RegionId, SessionState};

use super::constants::*;

/// Render the whole view as one text frame.
///
/// Hidden regions are left out; a region still waiting for its data shows a
/// placeholder instead of content.
pub fn render(view: &AppViewModel) -> String {
    let mut lines = vec![rule(APP_TITLE)];
    lines.push(format!(
        "Session {}: {}",
        view.session_id,
        session_label(view.session)
    ));
    if !view.status_text.is_empty() {
        lines.push(format!("Status: {}", view.status_text));
    }

    let progress = view.region(RegionId::PhaseProgress);
    if !progress.hidden {
        lines.push(format!(
            "Progress {} {:>3}%",
            bar(view.progress, PROGRESS_WIDTH),
            whole_percent(view.progress)
        ));
    }

    if !view.region(RegionId::MainContainer).hidden {
        render_domain(view, &mut lines);
        render_article(view, &mut lines);
        render_conclusion(view, &mut lines);
        render_checks(view, &mut lines);
        render_sources(view, &mut lines);
    }

    lines.push("=".repeat(FRAME_WIDTH));
    lines.join("\n")
}

/// A user-visible notice, set apart from the frame around it.
pub fn alert(message: &str) -> String {
    message
        .lines()
        .map(|line| format!("!! {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn session_label(session: SessionState) -> &'static str {
    match session {
        SessionState::Idle => "Idle",
        SessionState::Running => "Running",
        SessionState::Finished => "Finished",
        SessionState::Aborted => "Aborted",
    }
}

fn render_domain(view: &AppViewModel, lines: &mut Vec<String>) {
    if !open_section(view, RegionId::DomainBadges, "Domain", lines) {
        return;
    }
    let badges = [
        (RegionId::IpBadge, format!("IP: {}", view.domain.ip)),
        (
            RegionId::LocationBadge,
            format!("Location: {}", view.domain.location),
        ),
        (RegionId::DomainBadge, format!("Domain: {}", view.domain.domain)),
        (RegionId::ReputationBadge, "Bad reputation".to_string()),
    ];
    push_badges(view, badges, lines);
}

fn render_article(view: &AppViewModel, lines: &mut Vec<String>) {
    let title = match view.active_tab {
        ArticleTab::Summary => "Article: [Summary] | Full text",
        ArticleTab::Article => "Article: Summary | [Full text]",
    };
    if !open_section(view, RegionId::SummaryContainer, title, lines) {
        return;
    }

    let text = html2md::parse_html(&view.tab_html);
    let body: Vec<&str> = text.lines().collect();
    let shown = if view.summary_expanded {
        body.len()
    } else {
        body.len().min(COLLAPSED_LINES)
    };
    lines.extend(body[..shown].iter().map(|line| indent(line)));
    if shown < body.len() {
        lines.push(indent(&format!("... {} more lines", body.len() - shown)));
    }
    lines.push(indent(&format!(
        "{} with {}, switch tab with {}",
        view.expand_label, EXPAND_COMMAND, TAB_COMMAND
    )));
}

fn render_conclusion(view: &AppViewModel, lines: &mut Vec<String>) {
    let Some(conclusion) = &view.conclusion else {
        return;
    };

    if open_section(view, RegionId::ConclusionCard, "Verdict", lines) {
        lines.push(indent(&format!(
            "[{}] {}",
            conclusion.verdict.label().to_uppercase(),
            conclusion.verdict.headline()
        )));
        lines.push(indent(&conclusion.annotation));
    }

    if open_section(view, RegionId::ConclusionMarkdown, "Conclusion", lines) {
        let text = html2md::parse_html(&conclusion.conclusion_html);
        lines.extend(text.lines().map(indent));
    }

    if open_section(view, RegionId::ResultsSection, "Results", lines) {
        let bars = [
            ("Verified", conclusion.bars.verified),
            ("Unverified", conclusion.bars.unverified),
            ("Unrelated", conclusion.bars.unrelated),
        ];
        for (label, fraction) in bars {
            lines.push(indent(&format!(
                "{label:<11}{} {:>3}%",
                bar(fraction, BAR_WIDTH),
                whole_percent(fraction)
            )));
        }
    }
}

fn render_checks(view: &AppViewModel, lines: &mut Vec<String>) {
    if open_section(view, RegionId::ArticleBadges, "Article checks", lines) {
        let badges = [
            (RegionId::NoAuthorBadge, "No author".to_string()),
            (RegionId::NoSourcesBadge, "No sources cited".to_string()),
        ];
        push_badges(view, badges, lines);
    }
    if open_section(view, RegionId::ExtraBadges, "Extra checks", lines) {
        let badges = [
            (RegionId::RecentBadge, "Recent news".to_string()),
            (RegionId::GrammarBadge, "Grammar issues".to_string()),
        ];
        push_badges(view, badges, lines);
    }
}

fn render_sources(view: &AppViewModel, lines: &mut Vec<String>) {
    if !open_section(view, RegionId::SourcesContainer, "Sources", lines) {
        return;
    }
    if view.sources.is_empty() {
        lines.push(indent("No sources found."));
    }
    for source in &view.sources {
        lines.push(indent(&format!("[{}] {}", source.number, source.title)));
        lines.push(indent(&format!("    {}", source.summary)));
        lines.push(indent(&format!("    {}", source.url)));
    }
}

/// Push the heading for `id`. Returns whether its content should follow.
fn open_section(view: &AppViewModel, id: RegionId, title: &str, lines: &mut Vec<String>) -> bool {
    let flags = view.region(id);
    if flags.hidden {
        return false;
    }
    lines.push(rule(title));
    if flags.blurred {
        let placeholder = if flags.loading {
            LOADING_PLACEHOLDER
        } else {
            BLURRED_PLACEHOLDER
        };
        lines.push(indent(placeholder));
        return false;
    }
    true
}

fn push_badges<const N: usize>(
    view: &AppViewModel,
    badges: [(RegionId, String); N],
    lines: &mut Vec<String>,
) {
    let shown: Vec<String> = badges
        .into_iter()
        .filter(|(id, _)| !view.region(*id).hidden)
        .map(|(_, text)| format!("<{text}>"))
        .collect();
    if shown.is_empty() {
        lines.push(indent("none"));
    } else {
        lines.push(indent(&shown.join(" ")));
    }
}

fn rule(title: &str) -> String {
    let head = format!("-- {title} ");
    let fill = FRAME_WIDTH.saturating_sub(head.len());
    format!("{head}{}", "-".repeat(fill))
}

fn indent(line: &str) -> String {
    format!("  {line}")
}

fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifier_core::{update, AppState, Msg};

    fn drive(msgs: Vec<Msg>) -> AppViewModel {
        let mut state = AppState::new();
        for msg in msgs {
            state = update(state, msg).0;
        }
        state.view()
    }

    fn started() -> Vec<Msg> {
        vec![
            Msg::InputChanged("https://example.com/news".to_string()),
            Msg::SearchClicked,
        ]
    }

    #[test]
    fn idle_frame_has_no_sections() {
        let frame = render(&AppState::new().view());
        assert!(frame.contains("Session 0: Idle"));
        assert!(!frame.contains("Progress"));
        assert!(!frame.contains("-- Domain"));
    }

    #[test]
    fn running_frame_shows_placeholders_until_data_arrives() {
        let frame = render(&drive(started()));
        assert!(frame.contains("Status: Connecting..."));
        assert!(frame.contains("Progress ["));
        assert!(frame.contains("-- Domain"));
        assert!(frame.contains(LOADING_PLACEHOLDER));
        assert!(!frame.contains("-- Verdict"));
    }

    #[test]
    fn domain_badges_render_after_check_domain() {
        let mut msgs = started();
        msgs.push(Msg::FrameReceived(
            r#"{"phase":"check_domain","ip":"1.2.3.4","ip_country":"ES","ip_region":"Madrid","domain":"example.com"}"#
                .to_string(),
        ));
        let frame = render(&drive(msgs));
        assert!(frame.contains("<IP: 1.2.3.4> <Location: ES, Madrid> <Domain: example.com>"));
        assert!(!frame.contains("Bad reputation"));
    }

    #[test]
    fn collapsed_summary_is_truncated_until_expanded() {
        let summary: Vec<String> = (1..=10).map(|n| format!("Paragraph {n}.")).collect();
        let raw = article_frame(&summary.join("\\n\\n"));
        let mut msgs = started();
        msgs.push(Msg::FrameReceived(raw));

        let collapsed = render(&drive(msgs.clone()));
        assert!(collapsed.contains("more lines"));
        assert!(collapsed.contains("Expand with :expand"));

        msgs.push(Msg::ExpandToggled);
        let expanded = render(&drive(msgs));
        assert!(expanded.contains("Paragraph 10."));
        assert!(expanded.contains("Collapse with :expand"));
    }

    fn article_frame(summary: &str) -> String {
        format!(r#"{{"phase":"process_article","summary":"{summary}","markdown":"Full"}}"#)
    }

    #[test]
    fn conclusion_renders_verdict_and_bars() {
        let mut msgs = started();
        msgs.push(Msg::FrameReceived(
            r#"{"phase":"draw_conclusion","verified":true,"verified_percentage":0.5,"unverified_percentage":0.25,"unrelated_percentage":0.25,"conclusion":"Backed [1] by others."}"#
                .to_string(),
        ));
        let frame = render(&drive(msgs));
        assert!(frame.contains("[VERIFIED]"));
        assert!(frame.contains("50% of the results"));
        assert!(frame.contains("Backed by others."));
        assert!(frame.contains(&format!("Verified   {}  50%", bar(0.5, BAR_WIDTH))));
    }

    #[test]
    fn alert_prefixes_every_line() {
        assert_eq!(alert("Error: a\nException: b"), "!! Error: a\n!! Exception: b");
    }

    #[test]
    fn bar_fills_in_proportion() {
        assert_eq!(bar(0.5, 10), "[#####.....]");
        assert_eq!(bar(1.5, 4), "[####]");
        assert_eq!(bar(-1.0, 4), "[....]");
    }
}
