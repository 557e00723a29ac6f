// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pots payout at the end of a hand.
use log::info;

use riverboat_core::{
    poker::{Chips, HandValue},
    view::Payout,
};

use crate::observer::{HandEvent, Observer};

use super::state::Round;

/// Pays all pots to their winners.
///
/// A pot is split evenly between the best hands among its eligible seats, the
/// odd chips go to the first winner clockwise from the first seat to act
/// after the flop. A seat left alone in the hand wins without showing.
pub(crate) fn settle(round: &mut Round, observer: &mut dyn Observer) {
    let order = round.clockwise().collect::<Vec<_>>();
    let live = order
        .iter()
        .copied()
        .filter(|&i| round.hands[i].is_live())
        .collect::<Vec<_>>();

    assert!(!live.is_empty(), "Hand ended with no seats left");

    // Only evaluate hands if there is a showdown.
    let values = if live.len() > 1 {
        live.iter()
            .map(|&i| {
                let mut cards = round.hands[i].cards().to_vec();
                cards.extend_from_slice(&round.board);
                (i, HandValue::eval(&cards))
            })
            .collect::<Vec<_>>()
    } else {
        Vec::default()
    };

    let pots = round.ledger.drain();
    round.unsettled = pots.iter().map(|p| p.chips()).sum();

    for (pot_idx, pot) in pots.into_iter().enumerate() {
        if pot.chips() == Chips::ZERO {
            continue;
        }

        let mut contenders = live
            .iter()
            .copied()
            .filter(|&i| pot.is_eligible(round.hands[i].seat))
            .collect::<Vec<_>>();
        if contenders.is_empty() {
            contenders = live.clone();
        }

        let (winners, rank) = if contenders.len() == 1 {
            (contenders, None)
        } else {
            // Values are in clockwise order.
            let ranked = values
                .iter()
                .filter(|(i, _)| contenders.contains(i))
                .copied()
                .collect::<Vec<_>>();
            let best = ranked.iter().map(|(_, v)| *v).max();
            let winners = ranked
                .iter()
                .filter(|(_, v)| Some(*v) == best)
                .map(|(i, _)| *i)
                .collect::<Vec<_>>();
            (winners, best.map(|v| v.rank()))
        };

        let count = winners.len() as u32;
        let share = pot.chips() / count;
        let remainder = pot.chips() % count;

        let mut payouts = Vec::with_capacity(winners.len());
        for (k, &idx) in winners.iter().enumerate() {
            let chips = if k == 0 { share + remainder } else { share };
            round.pay(idx, chips);
            payouts.push(Payout {
                seat: round.hands[idx].seat,
                chips,
            });

            let hand = &round.hands[idx];
            let text = match rank {
                Some(rank) => format!("{} wins {chips} with {rank}", hand.name),
                None => format!("{} wins {chips}", hand.name),
            };
            info!("{text}");
            round.narrative.push(text);
        }

        round.unsettled -= pot.chips();

        round.emit(
            observer,
            HandEvent::PotSettled {
                pot: pot_idx,
                chips: pot.chips(),
                payouts,
                rank,
            },
        );
    }
}
