/// Number of steps between `connecting` (0) and `finished` (11).
pub const PHASE_COUNT: u8 = 11;

/// Status shown for a phase name the client does not recognise.
pub const UNKNOWN_STATUS: &str = "Unknown state.";

/// A stage of the server-side verification pipeline, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Connecting,
    CheckDomain,
    DownloadArticle,
    ParseArticle,
    ProcessArticle,
    Search,
    ProcessSearch,
    RankResults,
    CompareResults,
    DrawConclusion,
    LastChecks,
    Finished,
}

impl Phase {
    pub const ALL: [Phase; 12] = [
        Phase::Connecting,
        Phase::CheckDomain,
        Phase::DownloadArticle,
        Phase::ParseArticle,
        Phase::ProcessArticle,
        Phase::Search,
        Phase::ProcessSearch,
        Phase::RankResults,
        Phase::CompareResults,
        Phase::DrawConclusion,
        Phase::LastChecks,
        Phase::Finished,
    ];

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.wire_name() == name)
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Phase::Connecting => "connecting",
            Phase::CheckDomain => "check_domain",
            Phase::DownloadArticle => "download_article",
            Phase::ParseArticle => "parse_article",
            Phase::ProcessArticle => "process_article",
            Phase::Search => "search",
            Phase::ProcessSearch => "process_search",
            Phase::RankResults => "rank_results",
            Phase::CompareResults => "compare_results",
            Phase::DrawConclusion => "draw_conclusion",
            Phase::LastChecks => "last_checks",
            Phase::Finished => "finished",
        }
    }

    /// Position in the pipeline, `0..=PHASE_COUNT`.
    pub fn ordinal(self) -> u8 {
        match self {
            Phase::Connecting => 0,
            Phase::CheckDomain => 1,
            Phase::DownloadArticle => 2,
            Phase::ParseArticle => 3,
            Phase::ProcessArticle => 4,
            Phase::Search => 5,
            Phase::ProcessSearch => 6,
            Phase::RankResults => 7,
            Phase::CompareResults => 8,
            Phase::DrawConclusion => 9,
            Phase::LastChecks => 10,
            Phase::Finished => 11,
        }
    }

    /// Status line shown once this phase has been reported.
    ///
    /// The server reports a phase after it completes, so the text names the
    /// work that is now under way.
    pub fn status_text(self) -> &'static str {
        match self {
            Phase::Connecting => "Connecting...",
            Phase::CheckDomain => "Downloading the article from the given URL...",
            Phase::DownloadArticle => "Converting the article format...",
            Phase::ParseArticle => "Processing the downloaded article...",
            Phase::ProcessArticle => "Looking for sources in search engines...",
            Phase::Search => "Processing search results...",
            Phase::ProcessSearch => "Ranking search results...",
            Phase::RankResults => "Comparing information across sources...",
            Phase::CompareResults => "Drawing conclusions...",
            Phase::DrawConclusion => "Running final checks...",
            Phase::LastChecks => "Finishing...",
            Phase::Finished => "Finished",
        }
    }

    pub fn progress(self) -> f64 {
        f64::from(self.ordinal()) / f64::from(PHASE_COUNT)
    }
}
