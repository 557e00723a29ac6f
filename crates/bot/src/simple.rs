// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Simple bot strategies.
use anyhow::Result;
use async_trait::async_trait;
use rand::{Rng, SeedableRng, rngs::StdRng};

use riverboat_core::{
    action::Proposal,
    decision::DecisionMaker,
    poker::{Chips, Street},
    view::SeatView,
};

/// Calls any bet and checks when there is nothing to call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysCallOrCheck;

#[async_trait]
impl DecisionMaker for AlwaysCallOrCheck {
    fn label(&self) -> &str {
        "always-call"
    }

    async fn propose(&mut self, view: &SeatView) -> Result<Proposal> {
        Ok(if view.can_call() {
            Proposal::call("Calling the bet")
        } else {
            Proposal::check("Nothing to call")
        })
    }
}

/// Plays mostly calls with some random raises and folds.
///
/// Some raises are below the minimum and get repaired by the engine.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    /// Creates an agent with seeded randomness.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

#[async_trait]
impl DecisionMaker for RandomAgent {
    fn label(&self) -> &str {
        "random"
    }

    async fn propose(&mut self, view: &SeatView) -> Result<Proposal> {
        // Some randomness.
        let p = self.rng.random::<f64>();

        // Raise preflop with a pair.
        let [c1, c2] = view.hole_cards;
        if c1.rank() == c2.rank() && view.street == Street::Preflop && view.can_raise() && p > 0.2 {
            let by = view.min_raise + view.min_raise;
            return Ok(Proposal::raise(by, "Raising a pocket pair"));
        }

        if p < 0.1 && view.can_call() {
            Ok(Proposal::fold("Giving up"))
        } else if p < 0.15 && view.can_raise() {
            let max = view.min_raise.amount().max(1).saturating_mul(4);
            let by = Chips::new(self.rng.random_range(1..=max));
            Ok(Proposal::raise(by, "Random raise"))
        } else if p < 0.17 {
            let max = view.stack.amount().saturating_add(10);
            let amount = Chips::new(self.rng.random_range(0..=max));
            Ok(Proposal::bet(amount, "Random bet"))
        } else if view.can_call() {
            Ok(Proposal::call("Calling"))
        } else {
            Ok(Proposal::check("Checking"))
        }
    }
}
