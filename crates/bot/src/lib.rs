// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker bots.
//!
//! Decision makers that need no model, used to fill seats and in tests.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod scripted;
mod simple;

pub use scripted::Scripted;
pub use simple::{AlwaysCallOrCheck, RandomAgent};

/// Seat names for bots.
pub static NICKNAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Grace", "Heidi", "Ivan", "Mike",
];
