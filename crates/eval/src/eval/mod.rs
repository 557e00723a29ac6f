// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! It provides a [HandValue::eval] method that computes a hand value from rank
//! counts and suit masks without looking at the individual 5 cards combinations,
//! and a slower [HandValue::eval_with_best_hand] that also returns the five best
//! cards, useful for logs and to show a winning hand.

#[allow(clippy::module_inception)]
pub mod eval;
pub use eval::{HandRank, HandValue};
