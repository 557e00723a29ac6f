// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pots and side pots.
use ahash::{AHashMap, AHashSet};

use riverboat_core::poker::{Chips, SeatId};

/// A pot that contains seats bets.
#[derive(Debug, Default, Clone)]
pub struct Pot {
    chips: Chips,
    players: AHashSet<SeatId>,
    capped: bool,
}

impl Pot {
    /// The pot chips.
    pub fn chips(&self) -> Chips {
        self.chips
    }

    /// Checks if a seat can win this pot.
    pub fn is_eligible(&self, seat: SeatId) -> bool {
        self.players.contains(&seat)
    }

    /// The eligible seats in seat order.
    pub fn eligible(&self) -> Vec<SeatId> {
        let mut seats = self.players.iter().copied().collect::<Vec<_>>();
        seats.sort();
        seats
    }

    /// Checks if an all-in bounds this pot, new chips go to a new pot.
    pub fn is_capped(&self) -> bool {
        self.capped
    }
}

/// The state of a seat when a street is settled.
#[derive(Debug, Clone, Copy)]
pub struct SeatStatus {
    /// The seat.
    pub seat: SeatId,
    /// The seat has folded.
    pub folded: bool,
    /// The seat has no chips left.
    pub all_in: bool,
}

/// The chips committed in a hand.
///
/// Street bets are tracked per seat and moved to pots when a street is
/// settled, the first pot is the main pot and all others are side pots.
#[derive(Debug, Clone)]
pub struct PotLedger {
    pots: Vec<Pot>,
    street: AHashMap<SeatId, Chips>,
}

impl Default for PotLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PotLedger {
    /// Creates a ledger with an empty main pot.
    pub fn new() -> Self {
        Self {
            pots: vec![Pot::default()],
            street: AHashMap::default(),
        }
    }

    /// Records chips committed by a seat on the current street.
    pub fn commit(&mut self, seat: SeatId, amount: Chips) {
        *self.street.entry(seat).or_default() += amount;
    }

    /// The chips committed by a seat on the current street.
    pub fn committed(&self, seat: SeatId) -> Chips {
        self.street.get(&seat).copied().unwrap_or_default()
    }

    /// The chips committed on the current street by all seats.
    pub fn street_total(&self) -> Chips {
        self.street.values().sum()
    }

    /// All chips in the ledger, pots and street bets.
    pub fn total(&self) -> Chips {
        self.pots.iter().map(|p| p.chips).sum::<Chips>() + self.street_total()
    }

    /// The pots, the first one is the main pot.
    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    /// Moves this street bets to the pots.
    ///
    /// Bets are split in tiers at each distinct all-in amount of a live seat,
    /// every tier collects up to its level from each seat including folded
    /// ones and is won by the live seats that reached the tier top. Folded
    /// seats are removed from all pots.
    pub fn settle_street(&mut self, seats: &[SeatStatus]) {
        let commits = seats
            .iter()
            .map(|s| (*s, self.committed(s.seat)))
            .filter(|(_, amount)| *amount > Chips::ZERO)
            .collect::<Vec<_>>();

        assert_eq!(
            commits.iter().map(|(_, c)| *c).sum::<Chips>(),
            self.street_total(),
            "Street bets from seats not in the hand"
        );

        let mut levels = commits
            .iter()
            .filter(|(s, _)| s.all_in && !s.folded)
            .map(|(_, c)| *c)
            .chain(commits.iter().map(|(_, c)| *c).max())
            .collect::<Vec<_>>();
        levels.sort();
        levels.dedup();

        let mut floor = Chips::ZERO;
        for level in levels {
            let chips = commits
                .iter()
                .map(|(_, c)| (*c).min(level) - (*c).min(floor))
                .sum::<Chips>();

            let players = commits
                .iter()
                .filter(|(s, c)| !s.folded && *c >= level)
                .map(|(s, _)| s.seat)
                .collect::<AHashSet<_>>();

            let capped = commits
                .iter()
                .any(|(s, c)| s.all_in && !s.folded && *c == level);

            self.add_tier(chips, players, capped);
            floor = level;
        }

        self.street.clear();

        for status in seats.iter().filter(|s| s.folded) {
            for pot in self.pots.iter_mut() {
                pot.players.remove(&status.seat);
            }
        }
    }

    /// Removes all pots leaving an empty main pot.
    pub fn drain(&mut self) -> Vec<Pot> {
        std::mem::replace(&mut self.pots, vec![Pot::default()])
    }

    fn add_tier(&mut self, chips: Chips, players: AHashSet<SeatId>, capped: bool) {
        match self.pots.last_mut() {
            // Only folded seats bet this much, the chips go to the tier below.
            Some(last) if players.is_empty() => last.chips += chips,
            Some(last) if !last.capped => {
                last.chips += chips;
                last.players.extend(players);
                last.capped = capped;
            }
            _ => self.pots.push(Pot {
                chips,
                players,
                capped,
            }),
        }
    }
}
