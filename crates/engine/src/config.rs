// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table configuration.
use std::time::Duration;

use riverboat_core::poker::Chips;

/// Table configuration, fixed for a session.
#[derive(Debug, Clone)]
pub struct Config {
    /// The small blind amount.
    pub small_blind: Chips,
    /// The big blind amount.
    pub big_blind: Chips,
    /// The minimum raise increment and the minimum opening bet.
    pub min_raise: Chips,
    /// The stack given to each seat when it starts or goes bust.
    pub starting_stack: Chips,
    /// How long a decision maker has to propose an action.
    pub action_timeout: Duration,
    /// How long a decision maker has to update its notes after a hand.
    pub summary_timeout: Duration,
}

impl Config {
    /// The default action timeout.
    pub const ACTION_TIMEOUT: Duration = Duration::from_secs(30);

    /// The default notes update timeout.
    pub const SUMMARY_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for Config {
    fn default() -> Self {
        Self {
            small_blind: Chips::new(5),
            big_blind: Chips::new(10),
            min_raise: Chips::new(5),
            starting_stack: Chips::new(2_000),
            action_timeout: Self::ACTION_TIMEOUT,
            summary_timeout: Self::SUMMARY_TIMEOUT,
        }
    }
}
