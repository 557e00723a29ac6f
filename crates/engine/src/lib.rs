// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker hand engine.
//!
//! A [Table] plays Texas Hold'em hands between seats bound to
//! [DecisionMaker](riverboat_core::decision::DecisionMaker)s, it runs the
//! betting streets, keeps the pots and side pots, pays the winners and asks
//! each seat to update its notes after every hand. Every state transition is
//! reported to an [Observer].
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod config;
pub mod db;
pub mod error;
pub mod observer;
pub mod table;

pub use config::Config;
pub use error::{Error, Result};
pub use observer::{EventLog, HandEvent, Observer, Snapshot};
pub use table::{HandSummary, Seat, Table};
