// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Decision maker calls and the repair of invalid proposals.
use log::warn;
use std::time::Duration;
use tokio::time;

use riverboat_core::{
    action::{Action, Proposal, Proposed},
    poker::{Chips, SeatId},
    view::SeatView,
};

use super::seat::Seat;

/// The betting state a proposal is checked against.
#[derive(Debug, Clone, Copy)]
pub struct BetContext {
    /// The amount the seat must add to call.
    pub to_call: Chips,
    /// The seat stack.
    pub stack: Chips,
    /// The minimum raise increment and opening bet.
    pub min_raise: Chips,
}

/// A proposal resolved to a legal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The action to apply.
    pub action: Action,
    /// The proposal reasoning or why it was replaced.
    pub reasoning: String,
    /// The proposal was replaced by a different action.
    pub repaired: bool,
}

impl Resolved {
    fn accept(action: Action, proposal: &Proposal) -> Self {
        Self {
            action,
            reasoning: proposal.reasoning.clone(),
            repaired: false,
        }
    }

    fn repair(action: Action, reasoning: String) -> Self {
        Self {
            action,
            reasoning,
            repaired: true,
        }
    }
}

/// Resolves a proposal to a legal action.
///
/// The first matching rule wins:
///
/// 1. No proposal folds when facing a bet and checks otherwise.
/// 2. A check facing a bet folds.
/// 3. A call is a bet of the amount to call capped at the stack, or a check
///    when there is nothing to call.
/// 4. A raise over the stack goes all-in.
/// 5. A bet over the stack folds.
/// 6. A bet below the amount to call folds, unless the stack cannot cover the
///    call in which case it goes all-in.
/// 7. A raise increment below the minimum folds and an opening bet below the
///    minimum checks, all-in amounts are always accepted.
/// 8. A zero bet with nothing to call is a check.
pub fn repair(proposal: Option<&Proposal>, ctx: &BetContext) -> Resolved {
    let BetContext {
        to_call,
        stack,
        min_raise,
    } = *ctx;

    let Some(proposal) = proposal else {
        return if to_call > Chips::ZERO {
            Resolved::repair(Action::Fold, "No action taken, folding by default".into())
        } else {
            Resolved::repair(Action::Check, "No action taken, checking by default".into())
        };
    };

    match proposal.proposed {
        Proposed::Fold => Resolved::accept(Action::Fold, proposal),
        Proposed::Check if to_call > Chips::ZERO => Resolved::repair(
            Action::Fold,
            format!("Cannot check facing a bet of {to_call}, forced to fold"),
        ),
        Proposed::Check => Resolved::accept(Action::Check, proposal),
        Proposed::Call if to_call == Chips::ZERO => Resolved::accept(Action::Check, proposal),
        Proposed::Call => Resolved::accept(
            Action::Bet {
                amount: to_call.min(stack),
            },
            proposal,
        ),
        Proposed::Raise(by) => {
            let total = to_call + by;
            if total > stack {
                Resolved::repair(
                    Action::Bet { amount: stack },
                    format!("Not enough chips to raise by {by}, going all-in with {stack}"),
                )
            } else if by < min_raise && total < stack {
                let reason = format!("Raise of {by} is less than the minimum of {min_raise}");
                if to_call == Chips::ZERO {
                    Resolved::repair(Action::Check, format!("{reason}, checking instead"))
                } else {
                    Resolved::repair(Action::Fold, format!("{reason}, forced to fold"))
                }
            } else {
                Resolved::accept(Action::Bet { amount: total }, proposal)
            }
        }
        Proposed::Bet(amount) if amount > stack => Resolved::repair(
            Action::Fold,
            format!("Cannot bet {amount} with a stack of {stack}, forced to fold"),
        ),
        Proposed::Bet(amount) if amount < to_call => {
            if stack >= to_call || amount == Chips::ZERO {
                Resolved::repair(
                    Action::Fold,
                    format!("Bet of {amount} is below the {to_call} needed to call, forced to fold"),
                )
            } else if amount == stack {
                Resolved::accept(Action::Bet { amount }, proposal)
            } else {
                Resolved::repair(
                    Action::Bet { amount: stack },
                    format!("Not enough chips to call {to_call}, going all-in with {stack}"),
                )
            }
        }
        Proposed::Bet(amount) => {
            let raise = amount - to_call;
            if raise > Chips::ZERO && raise < min_raise && amount < stack {
                if to_call == Chips::ZERO {
                    Resolved::repair(
                        Action::Check,
                        format!("Bet of {amount} is less than the minimum of {min_raise}, checking instead"),
                    )
                } else {
                    Resolved::repair(
                        Action::Fold,
                        format!("Raise of {raise} is less than the minimum of {min_raise}, forced to fold"),
                    )
                }
            } else if amount == Chips::ZERO {
                Resolved::accept(Action::Check, proposal)
            } else {
                Resolved::accept(Action::Bet { amount }, proposal)
            }
        }
    }
}

/// Calls decision makers, a failed or late call is no action.
pub struct Gateway<'a> {
    seats: &'a mut [Seat],
    timeout: Duration,
}

impl<'a> Gateway<'a> {
    /// Creates a gateway for the table seats.
    pub fn new(seats: &'a mut [Seat], timeout: Duration) -> Self {
        Self { seats, timeout }
    }

    /// Asks a seat decision maker for a proposal.
    pub async fn propose(&mut self, seat: SeatId, view: &SeatView) -> Option<Proposal> {
        let timeout = self.timeout;
        let dm = self
            .seats
            .get_mut(seat.index())
            .and_then(Seat::decision_maker)?;

        match time::timeout(timeout, dm.propose(view)).await {
            Ok(Ok(proposal)) => Some(proposal),
            Ok(Err(e)) => {
                warn!("Seat {seat} decision failed: {e}");
                None
            }
            Err(_) => {
                warn!("Seat {seat} decision timed out after {}s", timeout.as_secs_f32());
                None
            }
        }
    }
}
