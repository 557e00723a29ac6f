// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table seat types.
use std::fmt;

use riverboat_core::{
    decision::DecisionMaker,
    poker::{Card, Chips, SeatId},
};

/// A table seat, lives for the whole session.
pub struct Seat {
    /// The seat table position.
    pub seat_id: SeatId,
    /// This seat display name.
    pub name: String,
    /// This seat chips.
    pub chips: Chips,
    /// The seat private notes carried between hands.
    pub notes: String,
    decision_maker: Option<Box<dyn DecisionMaker>>,
}

impl Seat {
    /// Creates a seat bound to a decision maker.
    pub fn new(
        seat_id: SeatId,
        name: impl Into<String>,
        chips: Chips,
        decision_maker: Box<dyn DecisionMaker>,
    ) -> Self {
        Self {
            seat_id,
            name: name.into(),
            chips,
            notes: String::default(),
            decision_maker: Some(decision_maker),
        }
    }

    /// Creates a seat with no decision maker, it is never dealt in.
    pub fn empty(seat_id: SeatId) -> Self {
        Self {
            seat_id,
            name: format!("Seat {seat_id}"),
            chips: Chips::ZERO,
            notes: String::default(),
            decision_maker: None,
        }
    }

    /// The label of the bound decision maker.
    pub fn label(&self) -> &str {
        self.decision_maker
            .as_ref()
            .map(|dm| dm.label())
            .unwrap_or("empty")
    }

    /// Checks if this seat has a decision maker.
    pub fn is_bound(&self) -> bool {
        self.decision_maker.is_some()
    }

    /// Checks if this seat can be dealt in.
    pub fn can_play(&self) -> bool {
        self.is_bound() && self.chips > Chips::ZERO
    }

    /// This seat decision maker.
    pub(crate) fn decision_maker(&mut self) -> Option<&mut Box<dyn DecisionMaker>> {
        self.decision_maker.as_mut()
    }

    /// Splits this seat into its decision maker and notes.
    pub(crate) fn decision_maker_and_notes(
        &mut self,
    ) -> Option<(&mut Box<dyn DecisionMaker>, &mut String)> {
        let Self {
            decision_maker,
            notes,
            ..
        } = self;
        decision_maker.as_mut().map(|dm| (dm, notes))
    }
}

impl fmt::Debug for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seat")
            .field("seat_id", &self.seat_id)
            .field("name", &self.name)
            .field("chips", &self.chips)
            .field("label", &self.label())
            .finish()
    }
}

/// A seat state for the duration of a hand.
#[derive(Debug, Clone)]
pub struct Hand {
    /// The seat in the hand.
    pub seat: SeatId,
    /// The seat name.
    pub name: String,
    /// The seat notes at the start of the hand.
    pub notes: String,
    /// The seat stack, chips not committed to the pot.
    pub stack: Chips,
    /// The amount committed on the current street.
    pub bet: Chips,
    /// The amount committed in the whole hand.
    pub total: Chips,
    /// The hole cards, dealt after the blinds.
    pub hole_cards: Option<[Card; 2]>,
    /// The seat has folded.
    pub folded: bool,
    /// The seat has no chips left behind.
    pub all_in: bool,
    /// The seat has acted since the last raise.
    pub acted: bool,
}

impl Hand {
    /// Creates a hand state for a seat.
    pub fn new(seat: &Seat) -> Self {
        Self {
            seat: seat.seat_id,
            name: seat.name.clone(),
            notes: seat.notes.clone(),
            stack: seat.chips,
            bet: Chips::ZERO,
            total: Chips::ZERO,
            hole_cards: None,
            folded: false,
            all_in: false,
            acted: false,
        }
    }

    /// Moves chips from the stack to this street bet.
    ///
    /// Panics if the stack cannot cover the amount.
    pub fn commit(&mut self, amount: Chips) {
        assert!(
            amount <= self.stack,
            "Seat {} commits {amount} with a stack of {}",
            self.seat,
            self.stack
        );

        self.stack -= amount;
        self.bet += amount;
        self.total += amount;
        self.all_in = self.stack == Chips::ZERO;
    }

    /// Sets this hand in fold state.
    pub fn fold(&mut self) {
        self.folded = true;
        self.acted = true;
    }

    /// Checks if the seat is still contesting the pot.
    pub fn is_live(&self) -> bool {
        !self.folded
    }

    /// Checks if the seat can still bet.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Checks if the seat must act to match the highest bet.
    pub fn needs_action(&self, highest_bet: Chips) -> bool {
        self.can_act() && (!self.acted || self.bet < highest_bet)
    }

    /// Reset state for a new street.
    pub fn start_street(&mut self) {
        self.bet = Chips::ZERO;
        self.acted = false;
    }

    /// The hole cards.
    ///
    /// Panics if cards have not been dealt yet.
    pub fn cards(&self) -> [Card; 2] {
        self.hole_cards
            .unwrap_or_else(|| panic!("Seat {} has no hole cards", self.seat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverboat_bot::AlwaysCallOrCheck;

    #[test]
    fn seat_binding() {
        let seat = Seat::new(SeatId::new(0), "Alice", Chips::new(100), Box::new(AlwaysCallOrCheck));
        assert!(seat.can_play());
        assert_eq!(seat.label(), "always-call");

        let empty = Seat::empty(SeatId::new(1));
        assert!(!empty.can_play());
        assert_eq!(empty.label(), "empty");

        let mut busted = Seat::new(SeatId::new(2), "Bob", Chips::ZERO, Box::new(AlwaysCallOrCheck));
        assert!(!busted.can_play());
        assert!(busted.decision_maker().is_some());
    }

    #[test]
    fn hand_commit() {
        let seat = Seat::new(SeatId::new(0), "Alice", Chips::new(100), Box::new(AlwaysCallOrCheck));
        let mut hand = Hand::new(&seat);

        hand.commit(Chips::new(40));
        assert_eq!(hand.stack, Chips::new(60));
        assert_eq!(hand.bet, Chips::new(40));
        assert!(!hand.all_in);
        assert!(hand.needs_action(Chips::new(40)));

        hand.acted = true;
        assert!(!hand.needs_action(Chips::new(40)));
        assert!(hand.needs_action(Chips::new(50)));

        hand.commit(Chips::new(60));
        assert!(hand.all_in);
        assert!(!hand.needs_action(Chips::new(500)));
        assert_eq!(hand.total, Chips::new(100));

        hand.start_street();
        assert_eq!(hand.bet, Chips::ZERO);
        assert_eq!(hand.total, Chips::new(100));
    }

    #[test]
    #[should_panic]
    fn hand_commit_over_stack() {
        let seat = Seat::new(SeatId::new(0), "Alice", Chips::new(10), Box::new(AlwaysCallOrCheck));
        Hand::new(&seat).commit(Chips::new(11));
    }
}
