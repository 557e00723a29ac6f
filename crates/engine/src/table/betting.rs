// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Betting street loop.
use log::{debug, warn};

use riverboat_core::poker::{Chips, Street};

use crate::observer::{HandEvent, Observer};

use super::{
    gateway::{BetContext, Gateway, repair},
    state::Round,
};

/// How a betting street ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreetOutcome {
    /// All seats that can act matched the highest bet.
    StreetComplete,
    /// One seat is left in the hand.
    HandOver,
}

/// Runs the betting for the current street.
///
/// Seats are asked to act clockwise from the first to act on this street,
/// seats that folded, are all-in, or acted and matched the highest bet are
/// skipped.
pub(crate) async fn run_street(
    round: &mut Round,
    gateway: &mut Gateway<'_>,
    observer: &mut dyn Observer,
    min_raise: Chips,
) -> StreetOutcome {
    let n = round.hands.len();
    let mut next = if round.street == Street::Preflop {
        round.preflop_first
    } else {
        round.postflop_first
    };

    loop {
        if round.count_live() < 2 {
            return StreetOutcome::HandOver;
        }

        if round.is_street_complete() {
            return StreetOutcome::StreetComplete;
        }

        let highest_bet = round.highest_bet;
        let Some(idx) = (0..n)
            .map(|k| (next + k) % n)
            .find(|&i| round.hands[i].needs_action(highest_bet))
        else {
            panic!("Street {} is not complete but no seat can act", round.street);
        };

        round.active = Some(idx);
        let view = round.seat_view(idx, min_raise);
        let seat = view.seat;
        let ctx = BetContext {
            to_call: view.to_call,
            stack: view.stack,
            min_raise,
        };

        debug!(
            "Seat {seat} to act on the {}, to call {} stack {} pot {}",
            round.street, ctx.to_call, ctx.stack, view.pot
        );

        let street = round.street;
        round.emit(
            observer,
            HandEvent::ActionRequested {
                seat,
                street,
                to_call: ctx.to_call,
            },
        );

        let proposal = gateway.propose(seat, &view).await;
        let resolved = repair(proposal.as_ref(), &ctx);
        if resolved.repaired {
            warn!("Seat {seat} action repaired to {}: {}", resolved.action, resolved.reasoning);
        } else {
            debug!("Seat {seat} {}", resolved.action);
        }

        round.apply(idx, resolved, observer);
        next = (idx + 1) % n;
    }
}
