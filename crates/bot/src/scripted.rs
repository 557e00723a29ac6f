// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! A bot that replays a list of proposals.
use anyhow::{Result, bail};
use async_trait::async_trait;
use log::debug;
use std::{collections::VecDeque, time::Duration};

use riverboat_core::{action::Proposal, decision::DecisionMaker, view::SeatView};

/// Proposes actions from a script, fails when the script is over.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    script: VecDeque<Proposal>,
    delay: Option<Duration>,
}

impl Scripted {
    /// Creates a bot that proposes the given actions in order.
    pub fn new(script: impl IntoIterator<Item = Proposal>) -> Self {
        Self {
            script: script.into_iter().collect(),
            delay: None,
        }
    }

    /// Creates a bot that always fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Waits before each response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The proposals left in the script.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait]
impl DecisionMaker for Scripted {
    fn label(&self) -> &str {
        "scripted"
    }

    async fn propose(&mut self, view: &SeatView) -> Result<Proposal> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.script.pop_front() {
            Some(proposal) => {
                debug!("Seat {} scripted {:?}", view.seat, proposal.proposed);
                Ok(proposal)
            }
            None => bail!("Seat {} script is over", view.seat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverboat_core::{
        action::Proposed,
        poker::{Card, Chips, Position, SeatId, Street},
    };

    fn view() -> SeatView {
        let card = "Ah".parse::<Card>().unwrap();
        SeatView {
            seat: SeatId::new(3),
            name: "Dave".to_string(),
            hole_cards: [card, card],
            board: vec![],
            street: Street::Flop,
            to_call: Chips::ZERO,
            pot: Chips::new(40),
            stack: Chips::new(100),
            committed: Chips::ZERO,
            highest_bet: Chips::ZERO,
            min_raise: Chips::new(5),
            position: Position::Button,
            narrative: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn replays_script() {
        let mut bot = Scripted::new([Proposal::bet(20, "Value"), Proposal::check("")]);
        assert_eq!(bot.remaining(), 2);

        let p = bot.propose(&view()).await.unwrap();
        assert_eq!(p.proposed, Proposed::Bet(Chips::new(20)));
        assert_eq!(p.reasoning, "Value");

        let p = bot.propose(&view()).await.unwrap();
        assert_eq!(p.proposed, Proposed::Check);

        let err = bot.propose(&view()).await.unwrap_err();
        assert_eq!(err.to_string(), "Seat 3 script is over");
    }

    #[tokio::test(start_paused = true)]
    async fn delays_responses() {
        let mut bot = Scripted::new([Proposal::fold("")]).with_delay(Duration::from_secs(10));
        let start = tokio::time::Instant::now();
        bot.propose(&view()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
