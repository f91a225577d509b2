//! End-to-end session behaviour through the public engine API.

use rust_decimal_macros::dec;

use sabot::engine::command::Command;
use sabot::engine::settings::Settings;
use sabot::engine::{Applied, Session, SessionConfig};
use sabot::shoe::history::Undone;
use sabot::strategy::ev::{expected_value, PayoutTable};
use sabot::strategy::sizing::recommend;
use sabot::types::{BetOutcome, Rank};

fn rank(v: u8) -> Rank {
    Rank::new(v).unwrap()
}

fn play(session: &mut Session, script: &str) -> Vec<Applied> {
    script
        .split(',')
        .map(|line| session.apply(line.parse::<Command>().unwrap()))
        .collect()
}

#[test]
fn test_fresh_shoe_scenario() {
    let session = Session::default();
    assert_eq!(session.remaining_total(), 416);
    assert!(session.remaining_by_rank().iter().all(|(_, n)| *n == 32));

    let p = session.advice().unwrap().probabilities;
    assert!((p.banker - 0.43808).abs() < 5e-4);
    assert!((p.player - 0.45269).abs() < 5e-4);
    assert!((p.tie - 0.10923).abs() < 5e-4);
    assert!((p.banker + p.player + p.tie - 1.0).abs() < 1e-9);
}

#[test]
fn test_accepted_cards_count_down_and_rejects_change_nothing() {
    let mut session = Session::new(SessionConfig {
        decks: 1,
        ..SessionConfig::default()
    });
    let mut expected = 52;
    for i in 0..80u32 {
        let r = rank((i % 3 + 1) as u8);
        let before = session.shoe();
        let history_len = session.history().len();
        if session.add_card(r).accepted {
            expected -= 1;
        } else {
            assert_eq!(session.shoe(), before);
            assert_eq!(session.history().len(), history_len);
        }
        assert_eq!(session.remaining_total(), expected);
    }
    // Ranks A, 2, 3 fully dealt: 12 cards accepted
    assert_eq!(session.remaining_total(), 40);
    assert_eq!(
        session.history().card_count() as u32,
        52 - session.remaining_total()
    );
}

#[test]
fn test_interleaved_rounds_undo_in_exact_order() {
    let mut session = Session::default();
    play(&mut session, "2,K,|,9,5,|,A");
    assert_eq!(session.remaining_total(), 411);
    assert_eq!(session.history().rounds().len(), 3);

    let mut undone = Vec::new();
    loop {
        match session.undo() {
            Undone::Nothing => break,
            u => undone.push(u),
        }
    }
    assert_eq!(
        undone,
        vec![
            Undone::Card(rank(1)),
            Undone::Separator,
            Undone::Card(rank(5)),
            Undone::Card(rank(9)),
            Undone::Separator,
            Undone::Card(rank(13)),
            Undone::Card(rank(2)),
        ]
    );
    assert_eq!(session.remaining_total(), 416);
    assert_eq!(session.shoe(), Session::default().shoe());
}

#[test]
fn test_depletion_scenario() {
    let mut session = Session::default();
    for _ in 0..32 {
        assert!(session.add_card(Rank::ACE).accepted);
    }
    assert!(!session.add_card(Rank::ACE).accepted);
    assert_eq!(session.shoe().count(Rank::ACE), 0);

    // Undo brings one back and it can be dealt again
    assert_eq!(session.undo(), Undone::Card(Rank::ACE));
    assert!(session.add_card(Rank::ACE).accepted);
}

#[test]
fn test_zero_ev_means_zero_stake() {
    let ev = expected_value(0.5, 1.0);
    assert_eq!(ev, 0.0);
    assert_eq!(recommend(dec!(10000000), ev, 1.0), 0);
}

#[test]
fn test_no_positive_stake_without_edge() {
    let mut session = Session::default();
    // Walk through a varied shoe; every zero-or-negative EV must size to zero.
    for i in 0..400u32 {
        session.add_card(rank((i * 7 % 13 + 1) as u8));
        if let Some(advice) = session.advice() {
            for rec in &advice.recommendations {
                if rec.ev <= 0.0 {
                    assert_eq!(rec.amount, 0, "{} sized with ev {}", rec.label, rec.ev);
                }
            }
        }
    }
}

#[test]
fn test_settings_update_recomputes_but_keeps_shoe() {
    let mut session = Session::new(SessionConfig {
        settings: Settings::new(dec!(1000000), 0.0).unwrap(),
        payouts: PayoutTable {
            tie: 9.0,
            ..PayoutTable::default()
        },
        ..SessionConfig::default()
    });
    session.add_card(rank(4));
    let shoe = session.shoe();

    let small = session.recommendations(1000.0, 0.0)[0].clone();
    let large = session.recommendations(100000.0, 0.0)[0].clone();
    assert_eq!(small.outcome, BetOutcome::Tie);
    assert!(large.amount > small.amount);
    assert_eq!(session.shoe(), shoe);
}

#[test]
fn test_empty_shoe_reports_no_data() {
    let mut session = Session::new(SessionConfig {
        decks: 1,
        ..SessionConfig::default()
    });
    for r in Rank::all() {
        for _ in 0..4 {
            session.add_card(r);
        }
    }
    assert!(session.advice().is_none());
    assert!(session.recommendations(1000.0, 2.0).is_empty());

    session.undo();
    assert!(session.advice().is_some());
}
