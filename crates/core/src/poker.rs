// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Types used in a Poker hand.
use serde::{Deserialize, Serialize};
use std::{fmt, iter, ops};

pub use riverboat_cards::{Card, Deck, InvalidDeck, Rank, Suit};

#[cfg(feature = "eval")]
pub use riverboat_eval::{HandRank, HandValue};

/// A table seat position, seats are numbered clockwise from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatId(u8);

impl SeatId {
    /// Creates a seat id for the given table position.
    pub const fn new(position: u8) -> Self {
        Self(position)
    }

    /// The seat table position.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for SeatId {
    fn from(val: usize) -> Self {
        SeatId(u8::try_from(val).unwrap_or_else(|_| panic!("Seat position {val} out of range")))
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chips amount.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Chips(u32);

impl Chips {
    /// The zero chips.
    pub const ZERO: Chips = Chips(0);

    /// Creates chips with the given value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The integer amount.
    pub fn amount(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Chips {
    fn from(val: u32) -> Self {
        Chips(val)
    }
}

impl From<Chips> for u32 {
    fn from(val: Chips) -> Self {
        val.0
    }
}

impl ops::Add for Chips {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Chips(self.0.saturating_add(rhs.0))
    }
}

impl ops::AddAssign for Chips {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl ops::Sub<Chips> for Chips {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl ops::SubAssign for Chips {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl ops::Div<u32> for Chips {
    type Output = Self;

    fn div(self, rhs: u32) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl ops::Rem<u32> for Chips {
    type Output = Self;

    fn rem(self, rhs: u32) -> Self::Output {
        Self(self.0 % rhs)
    }
}

impl iter::Sum for Chips {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Chips::ZERO, |acc, c| acc + c)
    }
}

impl<'a> iter::Sum<&'a Chips> for Chips {
    fn sum<I: Iterator<Item = &'a Chips>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Chips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.0;
        if amount >= 1_000_000 {
            write!(
                f,
                "{},{:03},{:03}",
                amount / 1_000_000,
                amount % 1_000_000 / 1_000,
                amount % 1000
            )
        } else if amount >= 1_000 {
            write!(f, "{},{:03}", amount / 1000, amount % 1000)
        } else {
            write!(f, "{}", amount)
        }
    }
}

/// A betting street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Street {
    /// Betting after the hole cards are dealt.
    Preflop,
    /// Betting after the first three community cards.
    Flop,
    /// Betting after the fourth community card.
    Turn,
    /// Betting after the last community card.
    River,
}

impl Street {
    /// The street that follows this one, none after the river.
    pub fn next(&self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Number of community cards revealed when entering this street.
    pub fn cards_dealt(&self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        };

        write!(f, "{name}")
    }
}

/// A seat position relative to the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// The dealer.
    Button,
    /// Posts the small blind.
    SmallBlind,
    /// Posts the big blind.
    BigBlind,
    /// First to act preflop after the blinds.
    UnderTheGun,
    /// Between under the gun and the cutoff.
    MiddlePosition,
    /// The seat before the button.
    Cutoff,
}

impl Position {
    /// The position of the seat `offset` seats clockwise from the button with
    /// `players` seats in the hand.
    pub fn from_button(offset: usize, players: usize) -> Self {
        // Heads-up the button posts the small blind.
        if players == 2 {
            return if offset == 0 {
                Position::SmallBlind
            } else {
                Position::BigBlind
            };
        }

        match offset {
            0 => Position::Button,
            1 => Position::SmallBlind,
            2 => Position::BigBlind,
            n if n == players - 1 && players > 4 => Position::Cutoff,
            3 => Position::UnderTheGun,
            _ => Position::MiddlePosition,
        }
    }

    /// The position label.
    pub fn label(&self) -> &'static str {
        match self {
            Position::Button => "Button",
            Position::SmallBlind => "Small Blind",
            Position::BigBlind => "Big Blind",
            Position::UnderTheGun => "Under the Gun",
            Position::MiddlePosition => "Middle Position",
            Position::Cutoff => "Cutoff",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
