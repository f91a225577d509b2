//! Card-detection feed.
//!
//! An external scanner detects dealt cards; the feed turns its output into
//! `Command::Card` events on the same channel as manual entry, so both are
//! applied by the session one at a time.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::command::Command;
use crate::types::Rank;

/// Source of detected cards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardSource: Send {
    /// Ranks detected since the previous poll, in dealing order.
    async fn poll(&mut self) -> Result<Vec<Rank>>;
}

// ---------------------------------------------------------------------------
// File tail source
// ---------------------------------------------------------------------------

/// Follows a text file written by a scanner, one card label per line.
///
/// Only complete lines appended since the last poll are read. A file that
/// shrinks (truncated by the scanner for a new shoe) is read from the start.
pub struct TailFeed {
    path: PathBuf,
    offset: u64,
    partial: String,
}

impl TailFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            partial: String::new(),
        }
    }

    /// Start at the current end of the file, ignoring what is already there.
    pub async fn from_end(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let offset = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(_) => 0,
        };
        Ok(Self {
            path,
            offset,
            partial: String::new(),
        })
    }
}

#[async_trait]
impl CardSource for TailFeed {
    async fn poll(&mut self) -> Result<Vec<Rank>> {
        let mut file = match tokio::fs::File::open(&self.path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open feed {}", self.path.display()))
            }
        };

        let len = file
            .metadata()
            .await
            .with_context(|| format!("Failed to stat feed {}", self.path.display()))?
            .len();
        if len < self.offset {
            info!(path = %self.path.display(), "Feed truncated, rereading from start");
            self.offset = 0;
            self.partial.clear();
        }

        file.seek(std::io::SeekFrom::Start(self.offset))
            .await
            .context("Failed to seek feed")?;
        let mut buf = String::new();
        let read = file
            .read_to_string(&mut buf)
            .await
            .with_context(|| format!("Failed to read feed {}", self.path.display()))?;
        self.offset += read as u64;

        self.partial.push_str(&buf);
        let Some(last_newline) = self.partial.rfind('\n') else {
            return Ok(Vec::new());
        };
        let complete: String = self.partial.drain(..=last_newline).collect();

        let mut ranks = Vec::new();
        for line in complete.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.parse::<Rank>() {
                Ok(rank) => ranks.push(rank),
                Err(e) => debug!(line, error = %e, "Skipping unreadable feed line"),
            }
        }
        Ok(ranks)
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Poll `source` every `interval`, forwarding cards as commands.
///
/// Returns when the receiving side of `tx` is dropped. Poll errors are
/// logged and the next tick tries again.
pub async fn run_feed<S: CardSource>(
    mut source: S,
    interval: Duration,
    tx: mpsc::Sender<Command>,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if tx.is_closed() {
            break;
        }
        match source.poll().await {
            Ok(ranks) => {
                for rank in ranks {
                    debug!(rank = %rank, "Feed detected card");
                    if tx.send(Command::Card(rank)).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => warn!(error = %e, "Feed poll failed"),
        }
    }
    debug!("Feed stopped");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("sabot_feed_{}.txt", uuid::Uuid::new_v4()));
        p
    }

    fn append(path: &PathBuf, text: &str) {
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        f.write_all(text.as_bytes()).unwrap();
    }

    #[tokio::test]
    async fn test_tail_reads_only_new_lines() {
        let path = temp_path();
        append(&path, "A\n9\n");
        let mut feed = TailFeed::new(&path);

        let first = feed.poll().await.unwrap();
        assert_eq!(first, vec![Rank::ACE, Rank::new(9).unwrap()]);
        assert!(feed.poll().await.unwrap().is_empty());

        append(&path, "K\nbogus\nQ");
        assert_eq!(feed.poll().await.unwrap(), vec![Rank::KING]);
        // "Q" completes once its newline arrives
        append(&path, "\n");
        assert_eq!(feed.poll().await.unwrap(), vec![Rank::new(12).unwrap()]);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_tail_from_end_skips_existing() {
        let path = temp_path();
        append(&path, "5\n6\n");
        let mut feed = TailFeed::from_end(&path).await.unwrap();
        assert!(feed.poll().await.unwrap().is_empty());
        append(&path, "7\n");
        assert_eq!(feed.poll().await.unwrap(), vec![Rank::new(7).unwrap()]);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_tail_missing_file_is_empty() {
        let mut feed = TailFeed::new(temp_path());
        assert!(feed.poll().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tail_truncation_restarts() {
        let path = temp_path();
        append(&path, "2\n3\n4\n");
        let mut feed = TailFeed::new(&path);
        assert_eq!(feed.poll().await.unwrap().len(), 3);

        std::fs::write(&path, "J\n").unwrap();
        assert_eq!(feed.poll().await.unwrap(), vec![Rank::new(11).unwrap()]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_run_feed_forwards_cards_in_order() {
        let mut source = MockCardSource::new();
        let mut calls = 0;
        source.expect_poll().returning(move || {
            calls += 1;
            match calls {
                1 => Ok(vec![Rank::ACE, Rank::KING]),
                2 => Err(anyhow::anyhow!("scanner offline")),
                _ => Ok(vec![Rank::new(6).unwrap()]),
            }
        });

        let received = tokio_test::block_on(async {
            let (tx, mut rx) = mpsc::channel(16);
            let handle = tokio::spawn(run_feed(source, Duration::from_millis(1), tx));
            let mut got = Vec::new();
            for _ in 0..3 {
                got.push(rx.recv().await.unwrap());
            }
            drop(rx);
            handle.await.unwrap();
            got
        });

        assert_eq!(
            received,
            vec![
                Command::Card(Rank::ACE),
                Command::Card(Rank::KING),
                Command::Card(Rank::new(6).unwrap()),
            ]
        );
    }
}
