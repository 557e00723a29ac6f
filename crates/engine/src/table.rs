// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table session types.
use futures_util::future::join_all;
use log::{error, info, warn};
use rand::Rng;
use tokio::time;

use riverboat_core::poker::{Chips, Deck, SeatId};

use crate::{
    config::Config,
    error::{Error, Result},
    observer::Observer,
};

mod betting;
mod gateway;
mod pots;
mod seat;
mod showdown;
mod state;

pub use gateway::{BetContext, Resolved, repair};
pub use pots::{Pot, PotLedger, SeatStatus};
pub use seat::{Hand, Seat};
pub use state::HandSummary;

use gateway::Gateway;
use state::Round;

/// A table that plays hands between its seats.
pub struct Table {
    config: Config,
    seats: Vec<Seat>,
    observer: Box<dyn Observer>,
}

impl Table {
    /// Creates a new table.
    ///
    /// Seats must be ordered by table position.
    pub fn new(config: Config, seats: Vec<Seat>, observer: Box<dyn Observer>) -> Result<Self> {
        if let Some((position, seat)) = seats
            .iter()
            .enumerate()
            .find(|(i, s)| s.seat_id.index() != *i)
        {
            return Err(Error::SeatMismatch {
                position,
                seat: seat.seat_id,
            });
        }

        Ok(Self {
            config,
            seats,
            observer,
        })
    }

    /// The table configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The table seats.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Total chips at the table.
    pub fn chips(&self) -> Chips {
        self.seats.iter().map(|s| s.chips).sum()
    }

    /// Plays a hand with the given button and deck.
    ///
    /// Seat stacks are updated at the end of the hand, a hand that fails
    /// leaves them unchanged.
    pub async fn play_hand(&mut self, button: SeatId, deck: Deck) -> Result<HandSummary> {
        let round = Round::new(&self.seats, button)?;
        let mut gateway = Gateway::new(&mut self.seats, self.config.action_timeout);
        let summary = state::play(
            round,
            deck,
            &mut gateway,
            self.observer.as_mut(),
            &self.config,
        )
        .await?;

        for (seat, chips) in &summary.stacks {
            self.seats[seat.index()].chips = *chips;
        }

        self.update_notes(&summary).await;

        Ok(summary)
    }

    /// Plays a number of hands moving the button one seat each hand.
    ///
    /// Busted seats get a new starting stack before each hand, a failed hand
    /// is logged and the session continues.
    pub async fn run<R: Rng + ?Sized>(&mut self, hands: usize, rng: &mut R) -> Vec<HandSummary> {
        let mut summaries = Vec::with_capacity(hands);

        for hand in 0..hands {
            self.reset_busted();

            let button = SeatId::from(hand % self.seats.len());
            let deck = Deck::new_and_shuffled(rng);

            info!("Playing hand {} of {hands}", hand + 1);
            match self.play_hand(button, deck).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => error!("Hand {} failed: {e}", hand + 1),
            }
        }

        summaries
    }

    /// Gives a new starting stack to seats with no chips.
    fn reset_busted(&mut self) {
        for seat in self.seats.iter_mut() {
            if seat.is_bound() && seat.chips == Chips::ZERO {
                info!(
                    "Seat {} is busted, resetting stack to {}",
                    seat.seat_id, self.config.starting_stack
                );
                seat.chips = self.config.starting_stack;
            }
        }
    }

    /// Asks all seats dealt in to update their notes, concurrently.
    ///
    /// A failed or late update keeps the previous notes.
    async fn update_notes(&mut self, summary: &HandSummary) {
        let timeout = self.config.summary_timeout;

        let updates = self.seats.iter_mut().filter_map(|seat| {
            let seat_id = seat.seat_id;
            let ctx = summary.context(seat_id)?;
            let (dm, notes) = seat.decision_maker_and_notes()?;

            Some(async move {
                let result = time::timeout(timeout, dm.summarize(&ctx, notes)).await;
                match result {
                    Ok(Ok(updated)) => *notes = updated,
                    Ok(Err(e)) => warn!("Seat {seat_id} notes update failed: {e}"),
                    Err(_) => warn!(
                        "Seat {seat_id} notes update timed out after {}s",
                        timeout.as_secs_f32()
                    ),
                }
            })
        });

        join_all(updates).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rand::{SeedableRng, rngs::StdRng};
    use std::{sync::Arc, time::Duration};

    use riverboat_bot::{AlwaysCallOrCheck, RandomAgent, Scripted};
    use riverboat_core::{
        action::Proposal,
        decision::DecisionMaker,
        poker::{Card, Street},
        view::{RoundContext, SeatView},
    };

    use crate::observer::{EventLog, HandEvent};

    /// Creates a deck that deals the given cards first.
    fn stacked_deck(cards: &str) -> Deck {
        let dealt = cards
            .split_whitespace()
            .map(|c| c.parse::<Card>().unwrap())
            .collect::<Vec<_>>();

        let mut all = Deck::default()
            .into_iter()
            .filter(|c| !dealt.contains(c))
            .collect::<Vec<_>>();
        all.extend(dealt.iter().rev());
        Deck::from_cards(all).unwrap()
    }

    fn seat(i: usize, chips: u32, dm: impl DecisionMaker + 'static) -> Seat {
        Seat::new(SeatId::from(i), format!("P{i}"), Chips::new(chips), Box::new(dm))
    }

    fn table(seats: Vec<Seat>) -> (Table, Arc<Mutex<EventLog>>) {
        let log = Arc::new(Mutex::new(EventLog::default()));
        let table = Table::new(Config::default(), seats, Box::new(log.clone())).unwrap();
        (table, log)
    }

    fn stacks(table: &Table) -> Vec<u32> {
        table.seats().iter().map(|s| s.chips.amount()).collect()
    }

    #[tokio::test]
    async fn odd_chip_split() {
        let (mut table, log) = table(vec![
            seat(0, 100, AlwaysCallOrCheck),
            seat(1, 100, Scripted::new([Proposal::fold("Weak hand")])),
            seat(2, 100, AlwaysCallOrCheck),
        ]);

        // Hole cards from the small blind then a royal flush on the board.
        let deck = stacked_deck("2c 3c 4d 5d 6s 7s Ah Kh Qh Jh Th");
        let summary = table.play_hand(SeatId::new(0), deck).await.unwrap();

        // Pot is 25, the big blind is the first winner after the button.
        assert_eq!(stacks(&table), vec![102, 95, 103]);
        assert_eq!(summary.final_pot(), Chips::new(25));
        assert_eq!(summary.board.len(), 5);
        assert_eq!(table.chips(), Chips::new(300));

        let log = log.lock();
        let Some(HandEvent::PotSettled { payouts, .. }) = log.of_kind("pot_settled").next() else {
            panic!("No pot settled");
        };
        assert_eq!(payouts[0].seat, SeatId::new(2));
        assert_eq!(payouts[0].chips, Chips::new(13));
        assert_eq!(log.of_kind("hand_ended").count(), 1);
    }

    #[tokio::test]
    async fn all_in_side_pots() {
        let (mut table, _log) = table(vec![
            seat(0, 100, Scripted::new([Proposal::raise(1_000, "All in")])),
            seat(1, 40, AlwaysCallOrCheck),
            seat(2, 100, AlwaysCallOrCheck),
        ]);

        // Seat 1 wins the main pot, seat 0 the side pot.
        let deck = stacked_deck("Ah Ad Qh Qd Kh Kd 2c 7d 9s 3c 5h");
        let summary = table.play_hand(SeatId::new(0), deck).await.unwrap();

        assert_eq!(stacks(&table), vec![120, 120, 0]);

        let pots = summary
            .events
            .iter()
            .filter_map(|e| match e {
                HandEvent::PotSettled { pot, chips, .. } => Some((*pot, chips.amount())),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(pots, vec![(0, 120), (1, 120)]);
    }

    #[tokio::test]
    async fn walk_to_big_blind() {
        let (mut table, _log) = table(vec![
            seat(0, 100, Scripted::new([Proposal::fold("")])),
            seat(1, 100, Scripted::new([Proposal::fold("")])),
            seat(2, 100, Scripted::failing()),
        ]);

        let summary = table.play_hand(SeatId::new(0), Deck::default()).await.unwrap();

        assert_eq!(stacks(&table), vec![100, 95, 105]);
        assert!(summary.board.is_empty());
        assert_eq!(summary.payouts.len(), 1);
    }

    #[tokio::test]
    async fn heads_up_blinds() {
        let (mut table, log) = table(vec![
            seat(0, 100, AlwaysCallOrCheck),
            seat(1, 100, AlwaysCallOrCheck),
        ]);

        table.play_hand(SeatId::new(1), Deck::default()).await.unwrap();

        let log = log.lock();
        let blinds = log
            .of_kind("blind_posted")
            .filter_map(|e| match e {
                HandEvent::BlindPosted { seat, amount, .. } => Some((seat.index(), amount.amount())),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(blinds, vec![(1, 5), (0, 10)]);

        // The button acts first preflop and last after the flop.
        let flop_actors = log
            .events
            .iter()
            .filter_map(|(e, _)| match e {
                HandEvent::ActionApplied { seat, street, .. } => Some((*street, seat.index())),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(flop_actors[0], (Street::Preflop, 1));
        assert_eq!(flop_actors[2], (Street::Flop, 0));
    }

    #[tokio::test]
    async fn snapshots_track_hand() {
        let (mut table, log) = table(vec![
            seat(0, 100, AlwaysCallOrCheck),
            seat(1, 100, AlwaysCallOrCheck),
            Seat::empty(SeatId::new(2)),
        ]);

        table.play_hand(SeatId::new(0), Deck::default()).await.unwrap();

        let log = log.lock();
        for (event, snapshot) in &log.events {
            assert_eq!(snapshot.stacks.len(), 3);
            let total = snapshot.stacks.iter().map(|(_, c)| *c).sum::<Chips>() + snapshot.pot;
            assert_eq!(total, Chips::new(200), "{event:?}");
        }

        let (_, last) = log.events.last().unwrap();
        assert_eq!(last.board.len(), 5);
        assert_eq!(last.pot, Chips::ZERO);
    }

    #[tokio::test]
    async fn failed_hands_keep_stacks() {
        let (mut table, log) = table(vec![
            seat(0, 100, AlwaysCallOrCheck),
            seat(1, 100, AlwaysCallOrCheck),
        ]);

        let mut deck = Deck::default();
        while deck.count() > 6 {
            deck.deal();
        }

        let res = table.play_hand(SeatId::new(0), deck).await;
        assert!(matches!(res, Err(Error::DeckExhausted)));
        assert_eq!(stacks(&table), vec![100, 100]);
        assert!(log.lock().events.is_empty());

        // Eight cards cover the hole cards but not the board.
        let mut deck = Deck::default();
        while deck.count() > 8 {
            deck.deal();
        }

        let res = table.play_hand(SeatId::new(0), deck).await;
        assert!(matches!(res, Err(Error::DeckExhausted)));
        assert!(log.lock().events.is_empty());

        let res = table.play_hand(SeatId::new(5), Deck::default()).await;
        assert!(matches!(res, Err(Error::InvalidButton { .. })));
    }

    #[tokio::test]
    async fn run_resets_busted_seats() {
        let (mut table, _log) = table(vec![
            seat(0, 0, AlwaysCallOrCheck),
            seat(1, 100, AlwaysCallOrCheck),
            Seat::empty(SeatId::new(2)),
        ]);

        let mut rng = StdRng::seed_from_u64(7);
        let summaries = table.run(1, &mut rng).await;

        assert_eq!(summaries.len(), 1);
        assert_eq!(table.chips(), Chips::new(2_100));
        assert_eq!(table.seats()[2].chips, Chips::ZERO);
    }

    #[tokio::test]
    async fn run_continues_after_failed_hands() {
        let (mut table, _log) = table(vec![seat(0, 100, AlwaysCallOrCheck), Seat::empty(SeatId::new(1))]);

        let mut rng = StdRng::seed_from_u64(7);
        let summaries = table.run(3, &mut rng).await;
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn chips_are_conserved() {
        let seats = (0..6)
            .map(|i| seat(i, 200, RandomAgent::new(i as u64)))
            .collect::<Vec<_>>();
        let (mut table, _log) = table(seats);

        let mut rng = StdRng::seed_from_u64(42);
        for hand in 0..50 {
            let button = SeatId::from(hand % 6);
            let before = table.chips();
            match table.play_hand(button, Deck::new_and_shuffled(&mut rng)).await {
                Ok(summary) => {
                    assert_eq!(table.chips(), before);
                    let winnings = summary
                        .hole_cards
                        .iter()
                        .map(|(s, _)| summary.winnings(*s))
                        .sum::<Chips>();
                    assert_eq!(summary.final_pot(), winnings);
                }
                Err(Error::NotEnoughSeats(_)) => break,
                Err(e) => panic!("Unexpected error {e}"),
            }
        }
    }

    #[test]
    fn seats_must_be_in_order() {
        let seats = vec![seat(1, 100, AlwaysCallOrCheck), seat(0, 100, AlwaysCallOrCheck)];
        assert!(matches!(
            Table::new(Config::default(), seats, Box::new(())),
            Err(Error::SeatMismatch { position: 0, .. })
        ));
    }

    struct NoteTaker {
        fail: bool,
        delay: Duration,
    }

    #[async_trait]
    impl DecisionMaker for NoteTaker {
        fn label(&self) -> &str {
            "note-taker"
        }

        async fn propose(&mut self, view: &SeatView) -> anyhow::Result<Proposal> {
            Ok(if view.can_check() {
                Proposal::check("")
            } else {
                Proposal::call("")
            })
        }

        async fn summarize(&mut self, ctx: &RoundContext, notes: &str) -> anyhow::Result<String> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                bail!("Summary failed");
            }

            Ok(format!("{notes}pot {};", ctx.final_pot))
        }
    }

    #[tokio::test]
    async fn notes_updates() {
        let note_taker = |fail, delay| NoteTaker { fail, delay };
        let seats = vec![
            seat(0, 100, note_taker(false, Duration::ZERO)),
            seat(1, 100, note_taker(true, Duration::ZERO)),
            seat(2, 100, note_taker(false, Duration::from_secs(60))),
        ];

        let config = Config {
            summary_timeout: Duration::from_millis(50),
            ..Config::default()
        };
        let mut table = Table::new(config, seats, Box::new(())).unwrap();

        table.play_hand(SeatId::new(0), Deck::default()).await.unwrap();
        table.play_hand(SeatId::new(1), Deck::default()).await.unwrap();

        let notes = table.seats().iter().map(|s| s.notes.as_str()).collect::<Vec<_>>();
        assert_eq!(notes, vec!["pot 30;pot 30;", "", ""]);
    }
}
