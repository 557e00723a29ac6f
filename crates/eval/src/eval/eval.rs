// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand value types.
use serde::{Deserialize, Serialize};
use std::fmt;

use riverboat_cards::{Card, Rank};

/// The hand category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// High card.
    HighCard = 0,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Straight.
    Straight,
    /// Flush.
    Flush,
    /// Full house.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Straight flush.
    StraightFlush,
}

impl HandRank {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0 => HandRank::HighCard,
            1 => HandRank::OnePair,
            2 => HandRank::TwoPair,
            3 => HandRank::ThreeOfAKind,
            4 => HandRank::Straight,
            5 => HandRank::Flush,
            6 => HandRank::FullHouse,
            7 => HandRank::FourOfAKind,
            8 => HandRank::StraightFlush,
            _ => panic!("Invalid hand rank bits {bits}"),
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
        };

        write!(f, "{name}")
    }
}

/// The value of a 5, 6 or 7 cards hand, a higher value wins.
///
/// The value is packed in a single integer:
///
/// ```text
///   +--------+--------+--------+--------+
///   |xxxxxxxx|xxxxcccc|aaaabbbb|ddddeeee| + 4 bits kicker
///   +--------+--------+--------+--------+
///   c = hand rank category
///   a..e = tie breaking ranks (deuce=0,..,ace=12) in significance order
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u32);

/// Bit mask for a five high straight (A, 2, 3, 4, 5).
const WHEEL: u16 = (1 << Rank::Ace as u16) | 0b1111;

impl HandValue {
    /// Evaluates a hand of 5 to 7 cards.
    ///
    /// Panics if the number of cards is not between 5 and 7.
    pub fn eval(cards: &[Card]) -> Self {
        assert!(
            (5..=7).contains(&cards.len()),
            "Evaluation requires 5 to 7 cards, got {}",
            cards.len()
        );

        let mut counts = [0u8; 13];
        let mut suits = [0u16; 4];
        let mut ranks = 0u16;

        for card in cards {
            let rank = card.rank() as usize;
            counts[rank] += 1;
            suits[card.suit() as usize] |= 1 << rank;
            ranks |= 1 << rank;
        }

        let flush = suits.iter().copied().find(|mask| mask.count_ones() >= 5);
        if let Some(high) = flush.and_then(straight_high) {
            return Self::pack(HandRank::StraightFlush, &[high]);
        }

        // Ranks grouped by size from the highest rank.
        let group = |n: u8| {
            (0..13u8)
                .rev()
                .filter(|r| counts[*r as usize] == n)
                .collect::<Vec<_>>()
        };

        let quads = group(4);
        let trips = group(3);
        let pairs = group(2);

        if let Some(&quad) = quads.first() {
            let kicker = high_ranks(ranks & !(1 << quad), 1);
            return Self::pack(HandRank::FourOfAKind, &[quad, kicker[0]]);
        }

        if let Some(&trip) = trips.first() {
            let pair = match (trips.get(1), pairs.first()) {
                (Some(&t), Some(&p)) => Some(t.max(p)),
                (Some(&t), None) => Some(t),
                (None, Some(&p)) => Some(p),
                (None, None) => None,
            };

            if let Some(pair) = pair {
                return Self::pack(HandRank::FullHouse, &[trip, pair]);
            }
        }

        if let Some(mask) = flush {
            return Self::pack(HandRank::Flush, &high_ranks(mask, 5));
        }

        if let Some(high) = straight_high(ranks) {
            return Self::pack(HandRank::Straight, &[high]);
        }

        if let Some(&trip) = trips.first() {
            let mut tb = vec![trip];
            tb.extend(high_ranks(ranks & !(1 << trip), 2));
            return Self::pack(HandRank::ThreeOfAKind, &tb);
        }

        if let [p1, p2, ..] = pairs[..] {
            let kicker = high_ranks(ranks & !(1 << p1) & !(1 << p2), 1);
            return Self::pack(HandRank::TwoPair, &[p1, p2, kicker[0]]);
        }

        if let Some(&pair) = pairs.first() {
            let mut tb = vec![pair];
            tb.extend(high_ranks(ranks & !(1 << pair), 3));
            return Self::pack(HandRank::OnePair, &tb);
        }

        Self::pack(HandRank::HighCard, &high_ranks(ranks, 5))
    }

    /// Evaluates a hand of 5 to 7 cards and returns the best 5 cards.
    pub fn eval_with_best_hand(cards: &[Card]) -> (Self, [Card; 5]) {
        assert!(
            (5..=7).contains(&cards.len()),
            "Evaluation requires 5 to 7 cards, got {}",
            cards.len()
        );

        let n = cards.len();
        let first = [cards[0], cards[1], cards[2], cards[3], cards[4]];
        let mut best = (Self::eval(&first), first);

        for a in 0..n {
            for b in (a + 1)..n {
                for c in (b + 1)..n {
                    for d in (c + 1)..n {
                        for e in (d + 1)..n {
                            let hand = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                            let value = Self::eval(&hand);
                            if value > best.0 {
                                best = (value, hand);
                            }
                        }
                    }
                }
            }
        }

        best
    }

    /// Returns the hand category.
    pub fn rank(&self) -> HandRank {
        HandRank::from_bits(self.0 >> 20)
    }

    fn pack(rank: HandRank, tie_breaks: &[u8]) -> Self {
        let value = tie_breaks
            .iter()
            .take(5)
            .chain(std::iter::repeat(&0))
            .take(5)
            .fold(rank as u32, |acc, r| (acc << 4) | *r as u32);
        Self(value)
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank())
    }
}

/// Returns the highest rank of a straight in this ranks mask.
fn straight_high(mask: u16) -> Option<u8> {
    (4..13u8)
        .rev()
        .find(|high| (mask >> (high - 4)) & 0x1f == 0x1f)
        .or_else(|| (mask & WHEEL == WHEEL).then_some(Rank::Five as u8))
}

/// Returns the `n` highest ranks in this ranks mask.
fn high_ranks(mask: u16, n: usize) -> Vec<u8> {
    (0..13u8)
        .rev()
        .filter(|r| mask & (1u16 << *r) != 0)
        .take(n)
        .collect()
}
