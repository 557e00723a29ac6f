// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Read only views given to decision makers.
use serde::{Deserialize, Serialize};

use crate::{
    action::Action,
    poker::{Card, Chips, Position, SeatId, Street},
};

/// The state a seat sees when it is asked to act.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    /// The acting seat.
    pub seat: SeatId,
    /// The seat display name.
    pub name: String,
    /// The seat hole cards.
    pub hole_cards: [Card; 2],
    /// The community cards revealed so far.
    pub board: Vec<Card>,
    /// The current street.
    pub street: Street,
    /// The amount this seat must add to call.
    pub to_call: Chips,
    /// Chips in all pots including this street bets.
    pub pot: Chips,
    /// This seat remaining stack.
    pub stack: Chips,
    /// The amount this seat has committed on this street.
    pub committed: Chips,
    /// The highest commitment on this street.
    pub highest_bet: Chips,
    /// The minimum raise increment.
    pub min_raise: Chips,
    /// The seat position.
    pub position: Position,
    /// What happened in the hand so far.
    pub narrative: Vec<String>,
    /// Private notes from previous hands.
    pub notes: Option<String>,
}

impl SeatView {
    /// Checks if the seat can check.
    pub fn can_check(&self) -> bool {
        self.to_call == Chips::ZERO
    }

    /// Checks if the seat must call, raise or fold.
    pub fn can_call(&self) -> bool {
        self.to_call > Chips::ZERO
    }

    /// Checks if the seat has chips to raise after calling.
    pub fn can_raise(&self) -> bool {
        self.stack > self.to_call
    }
}

/// Chips paid to a seat at the end of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// The winning seat.
    pub seat: SeatId,
    /// The chips won.
    pub chips: Chips,
}

/// An action applied during a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that acted.
    pub seat: SeatId,
    /// The resolved action.
    pub action: Action,
    /// The reasoning attached to the action.
    pub reasoning: String,
}

/// A completed hand as seen by one seat, used to update the seat notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundContext {
    /// The seat these notes are for.
    pub seat: SeatId,
    /// The seat hole cards.
    pub hole_cards: [Card; 2],
    /// The community cards.
    pub board: Vec<Card>,
    /// Total chips paid out.
    pub final_pot: Chips,
    /// The hand winners.
    pub winners: Vec<Payout>,
    /// All the actions applied in this hand.
    pub actions: Vec<ActionRecord>,
    /// The hand narrative.
    pub narrative: Vec<String>,
}
