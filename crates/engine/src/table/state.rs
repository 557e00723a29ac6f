// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand state types.
use log::{debug, info};

use riverboat_core::{
    action::Action,
    poker::{Card, Chips, Deck, Position, SeatId, Street},
    view::{ActionRecord, Payout, RoundContext, SeatView},
};

use crate::{
    config::Config,
    error::{Error, Result},
    observer::{Blind, HandEvent, Observer, Snapshot},
};

use super::{
    betting::{self, StreetOutcome},
    gateway::{Gateway, Resolved},
    pots::{PotLedger, SeatStatus},
    seat::{Hand, Seat},
    showdown,
};

/// The record of a completed hand.
#[derive(Debug, Clone)]
pub struct HandSummary {
    /// The button seat.
    pub button: SeatId,
    /// The community cards.
    pub board: Vec<Card>,
    /// The hole cards of the seats dealt in.
    pub hole_cards: Vec<(SeatId, [Card; 2])>,
    /// The final stacks of all table seats.
    pub stacks: Vec<(SeatId, Chips)>,
    /// The chips won by each winning seat.
    pub payouts: Vec<Payout>,
    /// The actions applied in the hand.
    pub actions: Vec<ActionRecord>,
    /// The hand narrative.
    pub narrative: Vec<String>,
    /// All events emitted during the hand.
    pub events: Vec<HandEvent>,
}

impl HandSummary {
    /// The final stack of a seat.
    pub fn stack(&self, seat: SeatId) -> Option<Chips> {
        self.stacks.iter().find(|(s, _)| *s == seat).map(|(_, c)| *c)
    }

    /// The chips won by a seat.
    pub fn winnings(&self, seat: SeatId) -> Chips {
        self.payouts
            .iter()
            .filter(|p| p.seat == seat)
            .map(|p| p.chips)
            .sum()
    }

    /// All chips paid out.
    pub fn final_pot(&self) -> Chips {
        self.payouts.iter().map(|p| p.chips).sum()
    }

    /// The hand as seen by a seat, none if the seat was not dealt in.
    pub fn context(&self, seat: SeatId) -> Option<RoundContext> {
        let hole_cards = self
            .hole_cards
            .iter()
            .find(|(s, _)| *s == seat)
            .map(|(_, c)| *c)?;

        Some(RoundContext {
            seat,
            hole_cards,
            board: self.board.clone(),
            final_pot: self.final_pot(),
            winners: self.payouts.clone(),
            actions: self.actions.clone(),
            narrative: self.narrative.clone(),
        })
    }
}

/// The state of a hand in progress.
#[derive(Debug)]
pub(crate) struct Round {
    pub street: Street,
    pub board: Vec<Card>,
    /// The seats dealt in, in table order.
    pub hands: Vec<Hand>,
    pub ledger: PotLedger,
    pub highest_bet: Chips,
    pub button: usize,
    pub small_blind: usize,
    pub big_blind: usize,
    pub preflop_first: usize,
    pub postflop_first: usize,
    pub active: Option<usize>,
    pub payouts: Vec<Payout>,
    pub actions: Vec<ActionRecord>,
    pub narrative: Vec<String>,
    pub events: Vec<HandEvent>,
    /// Chips taken from the pots and not paid yet.
    pub unsettled: Chips,
    idle: Vec<(SeatId, Chips)>,
    chips_in_play: Chips,
}

impl Round {
    /// Creates a hand for the seats that can play.
    ///
    /// The button moves to the next seat dealt in if the requested button
    /// cannot play.
    pub fn new(seats: &[Seat], button: SeatId) -> Result<Self> {
        if button.index() >= seats.len() {
            return Err(Error::InvalidButton {
                button,
                seats: seats.len(),
            });
        }

        let hands = seats
            .iter()
            .filter(|s| s.can_play())
            .map(Hand::new)
            .collect::<Vec<_>>();

        if hands.len() < 2 {
            return Err(Error::NotEnoughSeats(hands.len()));
        }

        let idle = seats
            .iter()
            .filter(|s| !s.can_play())
            .map(|s| (s.seat_id, s.chips))
            .collect();

        let n = hands.len();
        let button = hands
            .iter()
            .position(|h| h.seat >= button)
            .unwrap_or_default();

        // Heads-up the button posts the small blind and acts first preflop.
        let (small_blind, big_blind, preflop_first, postflop_first) = if n == 2 {
            (button, (button + 1) % n, button, (button + 1) % n)
        } else {
            (
                (button + 1) % n,
                (button + 2) % n,
                (button + 3) % n,
                (button + 1) % n,
            )
        };

        let chips_in_play = hands.iter().map(|h| h.stack).sum();

        Ok(Self {
            street: Street::Preflop,
            board: Vec::with_capacity(5),
            hands,
            ledger: PotLedger::new(),
            highest_bet: Chips::ZERO,
            button,
            small_blind,
            big_blind,
            preflop_first,
            postflop_first,
            active: None,
            payouts: Vec::default(),
            actions: Vec::default(),
            narrative: Vec::default(),
            events: Vec::default(),
            unsettled: Chips::ZERO,
            idle,
            chips_in_play,
        })
    }

    /// The button seat.
    pub fn button_seat(&self) -> SeatId {
        self.hands[self.button].seat
    }

    /// The position of a hand relative to the button.
    pub fn position(&self, idx: usize) -> Position {
        let n = self.hands.len();
        Position::from_button((idx + n - self.button) % n, n)
    }

    /// The hand indices clockwise from the first seat to act after the flop.
    pub fn clockwise(&self) -> impl Iterator<Item = usize> + '_ {
        let n = self.hands.len();
        (0..n).map(move |k| (self.postflop_first + k) % n)
    }

    /// The amount a hand must add to call.
    pub fn to_call(&self, idx: usize) -> Chips {
        self.highest_bet - self.hands[idx].bet
    }

    /// Returns the number of seats still in the hand.
    pub fn count_live(&self) -> usize {
        self.hands.iter().filter(|h| h.is_live()).count()
    }

    /// Checks if the betting on this street is over.
    pub fn is_street_complete(&self) -> bool {
        // A seat with chips that didn't match the bet has to act.
        if self
            .hands
            .iter()
            .any(|h| h.can_act() && h.bet < self.highest_bet)
        {
            return false;
        }

        // Only one seat has chips all others are all in.
        if self.hands.iter().filter(|h| h.can_act()).count() < 2 {
            return true;
        }

        self.hands.iter().filter(|h| h.can_act()).all(|h| h.acted)
    }

    /// The view of the hand for a seat.
    pub fn seat_view(&self, idx: usize, min_raise: Chips) -> SeatView {
        let hand = &self.hands[idx];
        SeatView {
            seat: hand.seat,
            name: hand.name.clone(),
            hole_cards: hand.cards(),
            board: self.board.clone(),
            street: self.street,
            to_call: self.to_call(idx),
            pot: self.pot(),
            stack: hand.stack,
            committed: hand.bet,
            highest_bet: self.highest_bet,
            min_raise,
            position: self.position(idx),
            narrative: self.narrative.clone(),
            notes: (!hand.notes.is_empty()).then(|| hand.notes.clone()),
        }
    }

    /// Chips in the pots and in this street bets.
    pub fn pot(&self) -> Chips {
        self.ledger.total() + self.unsettled
    }

    /// The current hand snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let mut stacks = self
            .hands
            .iter()
            .map(|h| (h.seat, h.stack))
            .chain(self.idle.iter().copied())
            .collect::<Vec<_>>();
        stacks.sort();

        Snapshot {
            stacks,
            board: self.board.clone(),
            active_seat: self.active.map(|idx| self.hands[idx].seat),
            pot: self.pot(),
            street: self.street,
        }
    }

    /// Sends an event to the observer and adds it to the hand log.
    pub fn emit(&mut self, observer: &mut dyn Observer, event: HandEvent) {
        observer.observe(&event, &self.snapshot());
        self.events.push(event);
    }

    /// Posts a blind, a short stack goes all in.
    pub fn post_blind(&mut self, idx: usize, blind: Blind, amount: Chips, observer: &mut dyn Observer) {
        let hand = &mut self.hands[idx];
        let amount = amount.min(hand.stack);
        hand.commit(amount);
        self.ledger.commit(hand.seat, amount);
        self.highest_bet = self.highest_bet.max(hand.bet);

        let name = match blind {
            Blind::Small => "small blind",
            Blind::Big => "big blind",
        };
        self.narrative
            .push(format!("{} posted the {name} of {amount}", hand.name));

        let seat = hand.seat;
        self.emit(observer, HandEvent::BlindPosted { seat, blind, amount });
        self.assert_chips();
    }

    /// Deals two cards to each hand starting from the small blind.
    pub fn deal_hole_cards(&mut self, deck: &mut Deck, observer: &mut dyn Observer) -> Result<()> {
        let n = self.hands.len();
        for k in 0..n {
            let idx = (self.small_blind + k) % n;
            let c1 = deck.deal().ok_or(Error::DeckExhausted)?;
            let c2 = deck.deal().ok_or(Error::DeckExhausted)?;
            self.hands[idx].hole_cards = Some([c1, c2]);

            let seat = self.hands[idx].seat;
            self.emit(
                observer,
                HandEvent::HoleCardsDealt {
                    seat,
                    cards: [c1, c2],
                },
            );
        }

        Ok(())
    }

    /// Starts a new street dealing its community cards.
    pub fn start_street(
        &mut self,
        street: Street,
        deck: &mut Deck,
        observer: &mut dyn Observer,
    ) -> Result<()> {
        for hand in self.hands.iter_mut() {
            hand.start_street();
        }

        self.street = street;
        self.highest_bet = Chips::ZERO;
        self.active = None;

        let cards = (0..street.cards_dealt())
            .map(|_| deck.deal().ok_or(Error::DeckExhausted))
            .collect::<Result<Vec<_>>>()?;
        self.board.extend_from_slice(&cards);

        let cards_str = cards
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        self.narrative.push(match street {
            Street::Flop => format!("The flop cards are {cards_str}"),
            _ => format!("The {street} card is {cards_str}"),
        });

        debug!("Dealt {street} {cards_str}");
        self.emit(observer, HandEvent::StreetAdvanced { street });
        self.emit(observer, HandEvent::CommunityDealt { street, cards });

        Ok(())
    }

    /// Applies a resolved action to a hand.
    ///
    /// Panics if the action is not legal for the hand.
    pub fn apply(&mut self, idx: usize, resolved: Resolved, observer: &mut dyn Observer) {
        let to_call = self.to_call(idx);
        let highest_bet = self.highest_bet;
        let hand = &mut self.hands[idx];
        assert!(hand.can_act(), "Seat {} acts after folding or going all-in", hand.seat);

        let text = match resolved.action {
            Action::Fold => {
                hand.fold();
                "folds".to_string()
            }
            Action::Check => {
                assert_eq!(to_call, Chips::ZERO, "Seat {} checks facing a bet", hand.seat);
                hand.acted = true;
                "checks".to_string()
            }
            Action::Bet { amount } => {
                assert!(amount > Chips::ZERO, "Seat {} bets zero chips", hand.seat);
                hand.commit(amount);
                hand.acted = true;
                assert!(
                    hand.bet >= highest_bet || hand.all_in,
                    "Seat {} bet {} is below the highest bet {highest_bet}",
                    hand.seat,
                    hand.bet
                );

                let text = if hand.bet <= highest_bet {
                    format!("calls {amount}")
                } else if highest_bet == Chips::ZERO {
                    format!("bets {amount}")
                } else {
                    format!("raises to {}", hand.bet)
                };

                if hand.all_in {
                    format!("{text} and is all-in")
                } else {
                    text
                }
            }
        };

        let seat = hand.seat;
        self.narrative.push(format!("{} {text}", hand.name));

        if let Action::Bet { amount } = resolved.action {
            self.ledger.commit(seat, amount);

            let bet = self.hands[idx].bet;
            if bet > self.highest_bet {
                self.highest_bet = bet;

                // A raise reopens the betting for seats that can act.
                for (i, hand) in self.hands.iter_mut().enumerate() {
                    if i != idx && hand.can_act() {
                        hand.acted = false;
                    }
                }
            }
        }

        self.actions.push(ActionRecord {
            seat,
            action: resolved.action,
            reasoning: resolved.reasoning.clone(),
        });

        let street = self.street;
        self.emit(
            observer,
            HandEvent::ActionApplied {
                seat,
                street,
                action: resolved.action,
                reasoning: resolved.reasoning,
                repaired: resolved.repaired,
            },
        );

        self.assert_chips();
    }

    /// Moves the street bets to the pots.
    pub fn settle_street(&mut self) {
        let seats = self
            .hands
            .iter()
            .map(|h| SeatStatus {
                seat: h.seat,
                folded: h.folded,
                all_in: h.all_in,
            })
            .collect::<Vec<_>>();
        self.ledger.settle_street(&seats);
        self.active = None;
    }

    /// Adds chips to a winning hand.
    pub fn pay(&mut self, idx: usize, chips: Chips) {
        let hand = &mut self.hands[idx];
        hand.stack += chips;

        match self.payouts.iter_mut().find(|p| p.seat == hand.seat) {
            Some(payout) => payout.chips += chips,
            None => self.payouts.push(Payout {
                seat: hand.seat,
                chips,
            }),
        }
    }

    /// Checks that no chips have been created or lost.
    ///
    /// Panics if stacks and pots don't add up to the chips at hand start.
    pub fn assert_chips(&self) {
        let stacks = self.hands.iter().map(|h| h.stack).sum::<Chips>();
        assert_eq!(
            stacks + self.pot(),
            self.chips_in_play,
            "Chips not conserved, stacks {stacks} pots {}",
            self.pot()
        );

        let committed = self.hands.iter().map(|h| h.total).sum::<Chips>();
        let paid = self.payouts.iter().map(|p| p.chips).sum::<Chips>();
        assert_eq!(
            self.pot() + paid,
            committed,
            "Pots don't match the chips committed"
        );
    }

    /// Ends the hand.
    fn finish(mut self, observer: &mut dyn Observer) -> HandSummary {
        assert_eq!(self.pot(), Chips::ZERO, "Chips left in the pots");
        self.active = None;
        self.assert_chips();

        let stacks = self.snapshot().stacks;
        self.emit(
            observer,
            HandEvent::HandEnded {
                stacks: stacks.clone(),
            },
        );

        HandSummary {
            button: self.button_seat(),
            board: self.board,
            hole_cards: self.hands.iter().map(|h| (h.seat, h.cards())).collect(),
            stacks,
            payouts: self.payouts,
            actions: self.actions,
            narrative: self.narrative,
            events: self.events,
        }
    }
}

/// Plays a hand from blinds to showdown.
pub(crate) async fn play(
    mut round: Round,
    mut deck: Deck,
    gateway: &mut Gateway<'_>,
    observer: &mut dyn Observer,
    config: &Config,
) -> Result<HandSummary> {
    // Hole cards plus a full board.
    if deck.count() < 2 * round.hands.len() + 5 {
        return Err(Error::DeckExhausted);
    }

    let button = round.button_seat();
    let seats = round.hands.iter().map(|h| h.seat).collect::<Vec<_>>();
    info!("Starting hand with button {button} and {} seats", seats.len());
    round.emit(observer, HandEvent::HandStarted { button, seats });

    round.post_blind(round.small_blind, Blind::Small, config.small_blind, observer);
    round.post_blind(round.big_blind, Blind::Big, config.big_blind, observer);
    round.deal_hole_cards(&mut deck, observer)?;
    round.emit(
        observer,
        HandEvent::StreetAdvanced {
            street: Street::Preflop,
        },
    );

    loop {
        let outcome = betting::run_street(&mut round, gateway, observer, config.min_raise).await;
        round.settle_street();

        if outcome == StreetOutcome::HandOver {
            break;
        }

        match round.street.next() {
            Some(street) => round.start_street(street, &mut deck, observer)?,
            None => break,
        }
    }

    showdown::settle(&mut round, observer);

    let summary = round.finish(observer);
    info!(
        "Hand ended, pot {} won by {}",
        summary.final_pot(),
        summary
            .payouts
            .iter()
            .map(|p| format!("seat {} ({})", p.seat, p.chips))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverboat_bot::AlwaysCallOrCheck;

    fn seats(stacks: &[u32]) -> Vec<Seat> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &chips)| {
                Seat::new(
                    SeatId::from(i),
                    format!("P{i}"),
                    Chips::new(chips),
                    Box::new(AlwaysCallOrCheck),
                )
            })
            .collect()
    }

    #[test]
    fn positions_six_seats() {
        let round = Round::new(&seats(&[100; 6]), SeatId::new(2)).unwrap();
        assert_eq!(round.button, 2);
        assert_eq!(round.small_blind, 3);
        assert_eq!(round.big_blind, 4);
        assert_eq!(round.preflop_first, 5);
        assert_eq!(round.postflop_first, 3);
        assert_eq!(round.position(2), Position::Button);
        assert_eq!(round.position(1), Position::Cutoff);
        assert_eq!(round.clockwise().collect::<Vec<_>>(), vec![3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn positions_heads_up() {
        let round = Round::new(&seats(&[100, 100]), SeatId::new(1)).unwrap();
        assert_eq!(round.button, 1);
        assert_eq!(round.small_blind, 1);
        assert_eq!(round.big_blind, 0);
        assert_eq!(round.preflop_first, 1);
        assert_eq!(round.postflop_first, 0);
    }

    #[test]
    fn button_skips_seats_out_of_play() {
        let mut seats = seats(&[100, 0, 100, 100]);
        seats.push(Seat::empty(SeatId::new(4)));

        let round = Round::new(&seats, SeatId::new(1)).unwrap();
        assert_eq!(round.hands.len(), 3);
        assert_eq!(round.button_seat(), SeatId::new(2));

        // Wraps around to the first seat.
        let round = Round::new(&seats, SeatId::new(4)).unwrap();
        assert_eq!(round.button_seat(), SeatId::new(0));

        let stacks = round.snapshot().stacks;
        assert_eq!(stacks.len(), 5);
        assert_eq!(stacks[1], (SeatId::new(1), Chips::ZERO));
    }

    #[test]
    fn invalid_hands() {
        assert!(matches!(
            Round::new(&seats(&[100, 0]), SeatId::new(0)),
            Err(Error::NotEnoughSeats(1))
        ));
        assert!(matches!(
            Round::new(&seats(&[100, 100]), SeatId::new(2)),
            Err(Error::InvalidButton { .. })
        ));
    }

    #[test]
    fn blinds_and_deal() {
        let mut round = Round::new(&seats(&[100, 3, 100]), SeatId::new(0)).unwrap();
        let mut deck = Deck::default();
        let mut observer = ();

        round.post_blind(round.small_blind, Blind::Small, Chips::new(5), &mut observer);
        round.post_blind(round.big_blind, Blind::Big, Chips::new(10), &mut observer);

        // The small blind is short and all-in.
        assert_eq!(round.hands[1].bet, Chips::new(3));
        assert!(round.hands[1].all_in);
        assert_eq!(round.hands[2].bet, Chips::new(10));
        assert_eq!(round.highest_bet, Chips::new(10));
        assert!(round.hands.iter().all(|h| !h.acted));
        assert_eq!(round.narrative[0], "P1 posted the small blind of 3");

        round.deal_hole_cards(&mut deck, &mut observer).unwrap();
        assert_eq!(deck.count(), 46);
        assert!(round.hands.iter().all(|h| h.hole_cards.is_some()));

        round.start_street(Street::Flop, &mut deck, &mut observer).unwrap();
        assert_eq!(round.board.len(), 3);
        assert_eq!(round.highest_bet, Chips::ZERO);
        assert!(round.narrative.last().unwrap().starts_with("The flop cards are"));
    }

    #[test]
    fn deck_exhausted() {
        let mut round = Round::new(&seats(&[100, 100]), SeatId::new(0)).unwrap();
        let mut deck = Deck::default();
        while deck.count() > 3 {
            deck.deal();
        }

        assert!(matches!(
            round.deal_hole_cards(&mut deck, &mut ()),
            Err(Error::DeckExhausted)
        ));
    }

    #[test]
    #[should_panic]
    fn check_facing_bet_panics() {
        let mut round = Round::new(&seats(&[100, 100]), SeatId::new(0)).unwrap();
        round.post_blind(round.small_blind, Blind::Small, Chips::new(5), &mut ());
        round.post_blind(round.big_blind, Blind::Big, Chips::new(10), &mut ());

        let resolved = Resolved {
            action: Action::Check,
            reasoning: String::default(),
            repaired: false,
        };
        round.apply(round.small_blind, resolved, &mut ());
    }
}
