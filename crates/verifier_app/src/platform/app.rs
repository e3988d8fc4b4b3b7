use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use verifier_core::{update, AppState, Msg, SessionState};
use verifier_logging::{verifier_info, verifier_warn};

use super::config::{self, DEFAULT_CONFIG_PATH};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination, LogLevel};
use super::ui::constants::{EXPAND_COMMAND, QUIT_COMMAND, TAB_COMMAND};
use super::ui::render;

/// Check a news article against the verification server.
#[derive(Debug, Parser)]
#[command(name = "verifier", version)]
struct Cli {
    /// RON config file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Server websocket endpoint, overriding the config file.
    #[arg(long, value_name = "WS_URL")]
    endpoint: Option<String>,
    /// Where log output goes, overriding the config file.
    #[arg(long, value_enum)]
    log: Option<LogDestination>,
    /// Most verbose log level, overriding the config file.
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
    /// Article URL, or `mock`. Without one, URLs are read from stdin.
    url: Option<String>,
}

/// Everything the controller loop reacts to.
pub(crate) enum LoopEvent {
    Msg(Msg),
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = config::load_config(&cli.config);
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(log) = cli.log {
        config.log = log;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    logging::initialize(config.log, config.log_level);
    if let Some(err) = config_error {
        verifier_warn!("{}; using defaults", err);
    }

    let (event_tx, event_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(config.channel_settings(), event_tx.clone(), config.alerts)
        .with_context(|| format!("cannot use endpoint {}", config.endpoint))?;

    let one_shot = cli.url.is_some();
    match cli.url {
        Some(url) => {
            for msg in [Msg::InputChanged(url), Msg::SearchClicked] {
                let _ = event_tx.send(LoopEvent::Msg(msg));
            }
        }
        None => {
            spawn_input_thread(event_tx).context("failed to start the input thread")?;
            println!("Enter an article URL, or {TAB_COMMAND}, {EXPAND_COMMAND}, {QUIT_COMMAND}.");
        }
    }

    let mut state = AppState::new();
    let mut submitted = false;
    for event in event_rx.iter() {
        let msg = match event {
            LoopEvent::Msg(msg) => msg,
            LoopEvent::Quit => break,
        };
        submitted |= matches!(msg, Msg::SearchClicked);

        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);
        if state.consume_dirty() {
            println!("{}", render::render(&state.view()));
        }

        if one_shot && submitted && state.session() != SessionState::Running {
            break;
        }
    }

    verifier_info!("Exiting in state {:?}", state.session());
    if one_shot {
        one_shot_outcome(state.session())
    } else {
        Ok(())
    }
}

/// A one-shot run succeeds only when the server reported `finished`.
fn one_shot_outcome(session: SessionState) -> anyhow::Result<()> {
    if session != SessionState::Finished {
        anyhow::bail!(
            "verification ended without a verdict ({})",
            render::session_label(session)
        );
    }
    Ok(())
}

/// Read commands and URLs from stdin, one per line.
fn spawn_input_thread(tx: mpsc::Sender<LoopEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("verifier-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                let msgs = match line.trim() {
                    QUIT_COMMAND => break,
                    TAB_COMMAND => vec![Msg::TabToggled],
                    EXPAND_COMMAND => vec![Msg::ExpandToggled],
                    input => vec![Msg::InputChanged(input.to_string()), Msg::SearchClicked],
                };
                for msg in msgs {
                    if tx.send(LoopEvent::Msg(msg)).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(LoopEvent::Quit);
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fails_unless_finished() {
        assert!(one_shot_outcome(SessionState::Finished).is_ok());
        for session in [SessionState::Idle, SessionState::Aborted] {
            let err = one_shot_outcome(session).unwrap_err();
            assert!(err.to_string().contains(render::session_label(session)));
        }
    }

    #[test]
    fn cli_url_and_overrides_parse() {
        let cli = Cli::parse_from([
            "verifier",
            "--endpoint",
            "ws://127.0.0.1:9000/ws",
            "--log",
            "both",
            "--log-level",
            "debug",
            "mock",
        ]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.endpoint.as_deref(), Some("ws://127.0.0.1:9000/ws"));
        assert_eq!(cli.log, Some(LogDestination::Both));
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.url.as_deref(), Some("mock"));
    }
}
