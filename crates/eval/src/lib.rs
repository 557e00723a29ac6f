// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker hand evaluator.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands. To use the evaluator
//! create a hand and use [HandValue] to evaluate the hand and get its rank:
//!
//! ```
//! # use riverboat_eval::*;
//! let hand = |s: &str| s.split(' ').map(|c| c.parse().unwrap()).collect::<Vec<Card>>();
//! let v1 = HandValue::eval(&hand("Ah Ad 7c 4s 2h"));
//! let v2 = HandValue::eval(&hand("3h 3d 3c 9s 2h"));
//! assert!(v2 > v1);
//! assert_eq!(v2.rank(), HandRank::ThreeOfAKind);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandRank, HandValue};

// Reexport cards types.
pub use riverboat_cards::{Card, Deck, Rank, Suit};
