// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! The decision maker interface.
use anyhow::Result;
use async_trait::async_trait;

use crate::{
    action::Proposal,
    view::{RoundContext, SeatView},
};

/// An agent bound to a seat that proposes actions.
///
/// Both calls are boundary calls that may be slow or fail, the engine bounds
/// them with a timeout and never retries them.
#[async_trait]
pub trait DecisionMaker: Send {
    /// The model or agent label bound to the seat.
    fn label(&self) -> &str;

    /// Proposes an action for the seat view.
    async fn propose(&mut self, view: &SeatView) -> Result<Proposal>;

    /// Returns the seat notes updated with what happened in a completed hand.
    async fn summarize(&mut self, _ctx: &RoundContext, notes: &str) -> Result<String> {
        Ok(notes.to_string())
    }
}
