// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand events and the observer interface.
use serde::Serialize;

use riverboat_core::{
    action::Action,
    poker::{Card, Chips, HandRank, SeatId, Street},
    view::Payout,
};

/// The blind kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Blind {
    /// The small blind.
    Small,
    /// The big blind.
    Big,
}

/// A state transition in a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HandEvent {
    /// A new hand started with the given seats dealt in.
    HandStarted {
        /// The button seat.
        button: SeatId,
        /// The seats dealt in, in table order.
        seats: Vec<SeatId>,
    },
    /// A seat posted a blind.
    BlindPosted {
        /// The posting seat.
        seat: SeatId,
        /// Small or big blind.
        blind: Blind,
        /// The posted amount, less than the blind for a short stack.
        amount: Chips,
    },
    /// A seat was dealt its hole cards.
    HoleCardsDealt {
        /// The seat.
        seat: SeatId,
        /// The hole cards.
        cards: [Card; 2],
    },
    /// Community cards were dealt for a street.
    CommunityDealt {
        /// The street the cards belong to.
        street: Street,
        /// The new cards.
        cards: Vec<Card>,
    },
    /// A new betting street started.
    StreetAdvanced {
        /// The street.
        street: Street,
    },
    /// A seat was asked to act.
    ActionRequested {
        /// The seat being asked.
        seat: SeatId,
        /// The current street.
        street: Street,
        /// The amount the seat must add to call.
        to_call: Chips,
    },
    /// A seat action was applied.
    ActionApplied {
        /// The acting seat.
        seat: SeatId,
        /// The street of the action.
        street: Street,
        /// The resolved action.
        action: Action,
        /// The reasoning from the decision maker or the repair reason.
        reasoning: String,
        /// The proposal was replaced by the repair policy.
        repaired: bool,
    },
    /// A pot was paid out.
    PotSettled {
        /// The pot index, 0 is the main pot.
        pot: usize,
        /// The pot chips.
        chips: Chips,
        /// The winners payouts.
        payouts: Vec<Payout>,
        /// The winning hand rank, none if the pot was won uncontested.
        rank: Option<HandRank>,
    },
    /// The hand ended.
    HandEnded {
        /// The final stacks of all table seats.
        stacks: Vec<(SeatId, Chips)>,
    },
}

impl HandEvent {
    /// The event name.
    pub fn kind(&self) -> &'static str {
        match self {
            HandEvent::HandStarted { .. } => "hand_started",
            HandEvent::BlindPosted { .. } => "blind_posted",
            HandEvent::HoleCardsDealt { .. } => "hole_cards_dealt",
            HandEvent::CommunityDealt { .. } => "community_dealt",
            HandEvent::StreetAdvanced { .. } => "street_advanced",
            HandEvent::ActionRequested { .. } => "action_requested",
            HandEvent::ActionApplied { .. } => "action_applied",
            HandEvent::PotSettled { .. } => "pot_settled",
            HandEvent::HandEnded { .. } => "hand_ended",
        }
    }
}

/// The state of the hand after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// The stacks of all table seats.
    pub stacks: Vec<(SeatId, Chips)>,
    /// The community cards.
    pub board: Vec<Card>,
    /// The seat being asked to act.
    pub active_seat: Option<SeatId>,
    /// Chips in the pots including this street bets.
    pub pot: Chips,
    /// The current street.
    pub street: Street,
}

/// Receives hand events as they happen.
///
/// Observers are called synchronously from the engine and must not block.
pub trait Observer: Send {
    /// Called after each state transition.
    fn observe(&mut self, event: &HandEvent, snapshot: &Snapshot);
}

impl Observer for () {
    fn observe(&mut self, _event: &HandEvent, _snapshot: &Snapshot) {}
}

/// An observer that keeps all events in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    /// The events with their snapshot in arrival order.
    pub events: Vec<(HandEvent, Snapshot)>,
}

impl EventLog {
    /// Returns the events of the given kind.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a HandEvent> + 'a {
        self.events
            .iter()
            .map(|(e, _)| e)
            .filter(move |e| e.kind() == kind)
    }
}

impl Observer for EventLog {
    fn observe(&mut self, event: &HandEvent, snapshot: &Snapshot) {
        self.events.push((event.clone(), snapshot.clone()));
    }
}

/// Forwards events to another observer through a shared handle.
///
/// Lets a caller keep access to an observer owned by a table.
impl<T: Observer> Observer for std::sync::Arc<parking_lot::Mutex<T>> {
    fn observe(&mut self, event: &HandEvent, snapshot: &Snapshot) {
        self.lock().observe(event, snapshot);
    }
}
