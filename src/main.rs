//! SABOT — Baccarat shoe tracker and wager advisor
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores saved bankroll settings, and runs the command loop: manual
//! entry from stdin and the optional card feed share one channel, and the
//! session applies their commands one at a time.

use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use sabot::config::AppConfig;
use sabot::engine::command::Command;
use sabot::engine::feed::{run_feed, TailFeed};
use sabot::engine::{Applied, Session};
use sabot::shoe::history::Undone;
use sabot::storage;

const BANNER: &str = r#"
 ____    _    ____   ___ _____
/ ___|  / \  | __ ) / _ \_   _|
\___ \ / _ \ |  _ \| | | || |
 ___) / ___ \| |_) | |_| || |
|____/_/   \_\____/ \___/ |_|

  Baccarat shoe tracker & wager advisor
  cards: A 2-9 0/10/T J Q K   round: |   undo: u   reset: r [decks]
  capital <n>   commission <pct>   status   quit
"#;

const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path = std::env::var("SABOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let cfg = if Path::new(&config_path).exists() {
        AppConfig::load(&config_path)?
    } else {
        warn!(path = %config_path, "Config file not found, using defaults");
        AppConfig::default()
    };

    println!("{BANNER}");

    // -- Session ---------------------------------------------------------

    let settings_path = cfg.storage.settings_path.clone();
    let mut session_cfg = cfg.session_config();
    if let Some(saved) = storage::load_settings(Some(&settings_path))? {
        session_cfg.settings = saved;
    }
    let mut session = Session::new(session_cfg);
    info!(
        session = %session.id(),
        decks = session.decks(),
        capital = %session.settings().capital,
        commission = session.settings().commission_percent,
        "SABOT ready"
    );
    print_advice(&session);

    // -- Producers -------------------------------------------------------

    let (tx, mut rx) = mpsc::channel::<Command>(64);

    let stdin_tx = tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(cmd) => {
                            if stdin_tx.send(cmd).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => println!("  ? {e}"),
                    }
                }
                Ok(None) => {
                    let _ = stdin_tx.send(Command::Quit).await;
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
    });

    if cfg.feed.enabled {
        let feed = if cfg.feed.skip_existing {
            TailFeed::from_end(&cfg.feed.path).await?
        } else {
            TailFeed::new(&cfg.feed.path)
        };
        info!(
            path = %cfg.feed.path,
            interval_ms = cfg.feed.poll_interval_ms,
            "Card feed started"
        );
        tokio::spawn(run_feed(
            feed,
            Duration::from_millis(cfg.feed.poll_interval_ms),
            tx.clone(),
        ));
    }
    drop(tx);

    // -- Main loop -------------------------------------------------------

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            cmd = rx.recv() => {
                let Some(cmd) = cmd else { break };
                let settings_cmd = matches!(cmd, Command::Capital(_) | Command::Commission(_));
                match session.apply(cmd) {
                    Applied::Quit => break,
                    Applied::Card(admission) if !admission.accepted => {
                        println!("  ! rank depleted, card ignored");
                    }
                    Applied::Undo(Undone::Nothing) => println!("  (history empty)"),
                    Applied::Settings(Err(e)) => println!("  ! {e}"),
                    Applied::Status => print_status(&session),
                    _ => {}
                }
                if settings_cmd {
                    if let Err(e) = storage::save_settings(session.settings(), Some(&settings_path)) {
                        error!(error = %e, "Failed to save settings");
                    }
                }
                print_advice(&session);
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    storage::save_settings(session.settings(), Some(&settings_path))?;
    info!(
        session = %session.id(),
        cards_seen = session.history().card_count(),
        remaining = session.remaining_total(),
        "SABOT shut down cleanly."
    );

    Ok(())
}

/// Print the ranked recommendations.
fn print_advice(session: &Session) {
    match session.advice() {
        Some(advice) => {
            println!("  -- remaining {} --", advice.remaining);
            for rec in &advice.recommendations {
                println!("  {rec}");
            }
        }
        None => println!("  -- shoe empty, no recommendation --"),
    }
}

/// Print shoe composition, recent rounds and settings.
fn print_status(session: &Session) {
    let counts: Vec<String> = session
        .remaining_by_rank()
        .iter()
        .map(|(rank, n)| format!("{rank}:{n}"))
        .collect();
    println!("  shoe    {}", counts.join(" "));
    if let Some(last) = session.history().iter().find_map(|e| e.rank()) {
        println!("  last    {last}");
    }
    for (i, round) in session.history().rounds().iter().enumerate().rev().take(5) {
        let cards: Vec<String> = round.iter().map(|r| r.to_string()).collect();
        println!("  round {:>3}  {}", i + 1, cards.join(" "));
    }
    println!(
        "  capital {:.0}  commission {}%",
        session.capital_f64(),
        session.settings().commission_percent
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sabot=info"));

    let json_logging = std::env::var("SABOT_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
