// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker cards types.
//!
//! This crate defines the types to create cards:
//!
//! ```
//! # use riverboat_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! assert_eq!(ah.to_string(), "Ah");
//! assert_eq!("Ah".parse(), Ok(ah));
//! ```
//!
//! and a [Deck] type for shuffling and dealing the cards of a hand, cards are
//! dealt from the back of the deck:
//!
//! ```
//! # use riverboat_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng());
//! let (c1, c2) = (deck.deal().unwrap(), deck.deal().unwrap());
//! assert_ne!(c1, c2);
//! assert_eq!(deck.count(), Deck::SIZE - 2);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, InvalidDeck, ParseCardError, Rank, Suit};
