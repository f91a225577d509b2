//! Scripted card source for integration testing.
//!
//! Provides a deterministic `CardSource` that hands out pre-recorded
//! batches of detected cards, then runs it through the feed runner into a
//! session alongside manual commands.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use sabot::engine::command::Command;
use sabot::engine::feed::{run_feed, CardSource};
use sabot::engine::{Applied, Session};
use sabot::types::Rank;

/// A card source replaying fixed batches, one batch per poll.
pub struct ScriptedSource {
    batches: VecDeque<Result<Vec<Rank>, String>>,
    polls: Arc<Mutex<usize>>,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Result<Vec<Rank>, String>>) -> Self {
        Self {
            batches: batches.into(),
            polls: Arc::new(Mutex::new(0)),
        }
    }

    /// Shared poll counter, readable after the source is moved into a task.
    pub fn polls(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.polls)
    }
}

#[async_trait]
impl CardSource for ScriptedSource {
    async fn poll(&mut self) -> Result<Vec<Rank>> {
        *self.polls.lock().unwrap() += 1;
        match self.batches.pop_front() {
            Some(Ok(ranks)) => Ok(ranks),
            Some(Err(msg)) => Err(anyhow!(msg)),
            None => Ok(Vec::new()),
        }
    }
}

fn rank(v: u8) -> Rank {
    Rank::new(v).unwrap()
}

#[tokio::test]
async fn test_feed_cards_reach_session() {
    let source = ScriptedSource::new(vec![
        Ok(vec![rank(1), rank(10)]),
        Err("scanner lost the table".into()),
        Ok(vec![]),
        Ok(vec![rank(6)]),
    ]);
    let polls = source.polls();

    let (tx, mut rx) = mpsc::channel(8);
    let feed = tokio::spawn(run_feed(source, Duration::from_millis(1), tx));

    let mut session = Session::default();
    let mut applied = Vec::new();
    while applied.len() < 3 {
        let cmd = rx.recv().await.expect("feed closed early");
        applied.push(session.apply(cmd));
    }
    drop(rx);
    feed.await.unwrap();

    assert!(applied
        .iter()
        .all(|a| matches!(a, Applied::Card(c) if c.accepted)));
    assert_eq!(session.remaining_total(), 413);
    assert_eq!(session.shoe().count(rank(10)), 31);
    assert!(*polls.lock().unwrap() >= 4);
}

#[tokio::test]
async fn test_manual_and_feed_share_one_queue() {
    // One-deck shoe with a single king left: the feed and the operator
    // both report it; exactly one is accepted.
    let mut session = Session::new(sabot::engine::SessionConfig {
        decks: 1,
        ..Default::default()
    });
    for _ in 0..3 {
        session.add_card(Rank::KING);
    }

    let (tx, mut rx) = mpsc::channel(8);
    let manual = tx.clone();
    let feed = tokio::spawn(run_feed(
        ScriptedSource::new(vec![Ok(vec![Rank::KING])]),
        Duration::from_millis(1),
        tx,
    ));
    manual.send(Command::Card(Rank::KING)).await.unwrap();
    manual.send(Command::Separator).await.unwrap();

    let mut accepted = 0;
    let mut rejected = 0;
    let mut separators = 0;
    while accepted + rejected < 2 || separators < 1 {
        match session.apply(rx.recv().await.unwrap()) {
            Applied::Card(c) if c.accepted => accepted += 1,
            Applied::Card(_) => rejected += 1,
            Applied::Separator => separators += 1,
            other => panic!("unexpected {other:?}"),
        }
    }
    drop(manual);
    drop(rx);
    feed.await.unwrap();

    assert_eq!((accepted, rejected), (1, 1));
    assert_eq!(session.shoe().count(Rank::KING), 0);
    assert_eq!(session.remaining_total(), 48);
}
