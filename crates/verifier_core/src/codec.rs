//! Inbound frame decoding and outbound request encoding.
//!
//! The server serialises its whole analysis record on every phase, so a frame
//! may carry any field with a `null` or empty value. Decoding is lenient about
//! field types and strict only about the frame being a JSON object.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use verifier_logging::verifier_warn;

use crate::Phase;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("frame is not a JSON object")]
    NotAnObject,
}

/// The only message the client ever sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub url: String,
}

pub fn encode_request(url: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SearchRequest {
        url: url.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainInfo {
    pub ip: String,
    pub ip_country: String,
    pub ip_region: String,
    pub domain: String,
}

impl DomainInfo {
    pub fn location(&self) -> String {
        format!("{}, {}", self.ip_country, self.ip_region)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleBodies {
    pub summary: String,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub summary: String,
}

/// Conclusion payload with percentages exactly as they came off the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConclusionReport {
    pub verified: bool,
    pub verified_percentage: f64,
    pub unverified_percentage: f64,
    pub unrelated_percentage: f64,
    pub conclusion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArticleChecks {
    pub has_bad_reputation: bool,
    pub noauthor: bool,
    pub nosource: bool,
    pub recent: bool,
    pub grammar: bool,
}

/// Abort signal. Any populated field ends the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerSignal {
    pub error: Option<String>,
    pub refusal: Option<String>,
    pub exception: Option<String>,
}

impl ServerSignal {
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.refusal.is_none() && self.exception.is_none()
    }

    /// One combined notice for the user, one line per populated field.
    pub fn user_message(&self) -> String {
        let mut lines = Vec::with_capacity(3);
        if let Some(error) = &self.error {
            lines.push(format!("Error: {error}"));
        }
        if let Some(refusal) = &self.refusal {
            lines.push(refusal.clone());
        }
        if let Some(exception) = &self.exception {
            lines.push(format!("Exception: {exception}"));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhaseMessage {
    CheckDomain(DomainInfo),
    ProcessArticle(ArticleBodies),
    ProcessSearch(Vec<SearchResult>),
    DrawConclusion(ConclusionReport),
    LastChecks(ArticleChecks),
    Finished,
    /// A known phase that carries nothing the client renders.
    Progress(Phase),
    /// A phase name this client does not know (empty when missing).
    Unknown(String),
    ServerError(ServerSignal),
}

impl PhaseMessage {
    pub fn phase(&self) -> Option<Phase> {
        match self {
            PhaseMessage::CheckDomain(_) => Some(Phase::CheckDomain),
            PhaseMessage::ProcessArticle(_) => Some(Phase::ProcessArticle),
            PhaseMessage::ProcessSearch(_) => Some(Phase::ProcessSearch),
            PhaseMessage::DrawConclusion(_) => Some(Phase::DrawConclusion),
            PhaseMessage::LastChecks(_) => Some(Phase::LastChecks),
            PhaseMessage::Finished => Some(Phase::Finished),
            PhaseMessage::Progress(phase) => Some(*phase),
            PhaseMessage::Unknown(_) | PhaseMessage::ServerError(_) => None,
        }
    }
}

pub fn decode(raw: &str) -> Result<PhaseMessage, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(map) = value else {
        return Err(DecodeError::NotAnObject);
    };
    let fields = Fields(&map);

    // Abort signals win over whatever else the frame carries.
    let signal = ServerSignal {
        error: fields.signal("error"),
        refusal: fields.signal("refusal"),
        exception: fields.signal("exception"),
    };
    if !signal.is_empty() {
        return Ok(PhaseMessage::ServerError(signal));
    }

    let name = fields.text("phase");
    let Some(phase) = Phase::from_wire(&name) else {
        return Ok(PhaseMessage::Unknown(name));
    };

    let message = match phase {
        Phase::CheckDomain => PhaseMessage::CheckDomain(DomainInfo {
            ip: fields.text("ip"),
            ip_country: fields.text("ip_country"),
            ip_region: fields.text("ip_region"),
            domain: fields.text("domain"),
        }),
        Phase::ProcessArticle => PhaseMessage::ProcessArticle(ArticleBodies {
            summary: fields.text("summary"),
            markdown: fields.text("markdown"),
        }),
        Phase::ProcessSearch => PhaseMessage::ProcessSearch(fields.search_results()),
        Phase::DrawConclusion => PhaseMessage::DrawConclusion(ConclusionReport {
            verified: fields.flag("verified").unwrap_or(false),
            verified_percentage: fields.number("verified_percentage"),
            unverified_percentage: fields.number("unverified_percentage"),
            unrelated_percentage: fields.number("unrelated_percentage"),
            conclusion: fields.text("conclusion"),
        }),
        Phase::LastChecks => PhaseMessage::LastChecks(ArticleChecks {
            has_bad_reputation: fields.flag("has_bad_reputation").unwrap_or(false),
            noauthor: fields.flag_or_negated("noauthor", "has_author"),
            nosource: fields.flag_or_negated("nosource", "has_sources"),
            recent: fields.flag_or_alias("recent", "is_recent"),
            grammar: fields.flag_or_alias("grammar", "has_grammar_issues"),
        }),
        Phase::Finished => PhaseMessage::Finished,
        Phase::Connecting
        | Phase::DownloadArticle
        | Phase::ParseArticle
        | Phase::Search
        | Phase::RankResults
        | Phase::CompareResults => PhaseMessage::Progress(phase),
    };
    Ok(message)
}

struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// `None` when the field is missing or null, otherwise its truthiness.
    fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(truthy(value)),
        }
    }

    fn flag_or_alias(&self, key: &str, alias: &str) -> bool {
        self.flag(key).or_else(|| self.flag(alias)).unwrap_or(false)
    }

    fn flag_or_negated(&self, key: &str, positive: &str) -> bool {
        self.flag(key)
            .or_else(|| self.flag(positive).map(|value| !value))
            .unwrap_or(false)
    }

    fn number(&self, key: &str) -> f64 {
        let parsed = match self.0.get(key) {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|value| value.is_finite()).unwrap_or(0.0)
    }

    fn signal(&self, key: &str) -> Option<String> {
        let value = self.0.get(key)?;
        if !truthy(value) {
            return None;
        }
        match value {
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    fn search_results(&self) -> Vec<SearchResult> {
        let Some(Value::Array(items)) = self.0.get("search_results") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| {
                let Value::Object(entry) = item else {
                    verifier_warn!("Dropping non-object search result: {}", item);
                    return None;
                };
                let entry = Fields(entry);
                let url = entry.text("url");
                if url.is_empty() {
                    verifier_warn!("Dropping search result without url");
                    return None;
                }
                Some(SearchResult {
                    url,
                    title: entry.text("title"),
                    summary: entry.text("summary"),
                })
            })
            .collect()
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
