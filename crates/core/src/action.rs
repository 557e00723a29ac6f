// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Actions proposed by decision makers and actions applied by the engine.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::poker::Chips;

/// An action applied to a hand.
///
/// This is the only action form the betting engine handles, every proposal is
/// resolved to one of these variants before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Put chips in the pot, calls and raises are bets.
    Bet {
        /// The chips added to the pot by this action.
        amount: Chips,
    },
    /// Check.
    Check,
    /// Fold.
    Fold,
}

impl Action {
    /// The action label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Bet { .. } => "bet",
            Action::Check => "check",
            Action::Fold => "fold",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bet { amount } => write!(f, "bet {amount}"),
            action => write!(f, "{}", action.label()),
        }
    }
}

/// An action proposed by a decision maker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proposed {
    /// Put the given amount in the pot.
    Bet(Chips),
    /// Match the current bet.
    Call,
    /// Raise by the given amount over the amount to call.
    Raise(Chips),
    /// Check.
    Check,
    /// Fold.
    Fold,
}

/// A decision maker proposal with its reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// The proposed action.
    pub proposed: Proposed,
    /// Free text reasoning for the action.
    pub reasoning: String,
}

impl Proposal {
    /// Creates a new proposal.
    pub fn new(proposed: Proposed, reasoning: impl Into<String>) -> Self {
        Self {
            proposed,
            reasoning: reasoning.into(),
        }
    }

    /// A bet proposal.
    pub fn bet(amount: impl Into<Chips>, reasoning: impl Into<String>) -> Self {
        Self::new(Proposed::Bet(amount.into()), reasoning)
    }

    /// A call proposal.
    pub fn call(reasoning: impl Into<String>) -> Self {
        Self::new(Proposed::Call, reasoning)
    }

    /// A raise proposal.
    pub fn raise(by: impl Into<Chips>, reasoning: impl Into<String>) -> Self {
        Self::new(Proposed::Raise(by.into()), reasoning)
    }

    /// A check proposal.
    pub fn check(reasoning: impl Into<String>) -> Self {
        Self::new(Proposed::Check, reasoning)
    }

    /// A fold proposal.
    pub fn fold(reasoning: impl Into<String>) -> Self {
        Self::new(Proposed::Fold, reasoning)
    }
}

/// An untyped tool call as returned by a language model.
///
/// ```
/// # use riverboat_core::action::{Proposed, ToolCall};
/// # use serde_json::json;
/// let call = ToolCall::new("raise", json!({"raiseAmount": 40, "reasoning": "Top pair"}));
/// let proposal = call.to_proposal().unwrap();
/// assert_eq!(proposal.proposed, Proposed::Raise(40.into()));
///
/// let call = ToolCall::new("raise", json!({"raiseAmount": -5}));
/// assert!(call.to_proposal().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// The tool name.
    pub name: String,
    /// The tool arguments.
    pub arguments: Value,
}

impl ToolCall {
    /// Creates a new tool call.
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Converts this tool call to a typed proposal.
    ///
    /// Returns `None` for unknown tools and for bets or raises without a valid
    /// amount, the engine handles `None` as no action.
    pub fn to_proposal(&self) -> Option<Proposal> {
        let reasoning = self
            .arguments
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let proposed = match self.name.trim().to_ascii_lowercase().as_str() {
            "bet" => Proposed::Bet(self.amount(&["amount"])?),
            "raise" => Proposed::Raise(self.amount(&["raiseAmount", "raise_amount", "amount"])?),
            "call" => Proposed::Call,
            "check" => Proposed::Check,
            "fold" => Proposed::Fold,
            _ => return None,
        };

        Some(Proposal::new(proposed, reasoning))
    }

    /// Gets the first valid amount from the given argument names.
    fn amount(&self, names: &[&str]) -> Option<Chips> {
        let value = names.iter().find_map(|n| self.arguments.get(n))?;
        let amount = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };

        if !amount.is_finite() || amount < 0.0 {
            return None;
        }

        // Float to int casts saturate.
        Some(Chips::new(amount.floor() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_call_actions() {
        let p = ToolCall::new("bet", json!({"amount": 25, "reasoning": "value"}))
            .to_proposal()
            .unwrap();
        assert_eq!(p.proposed, Proposed::Bet(Chips::new(25)));
        assert_eq!(p.reasoning, "value");

        let p = ToolCall::new("Call", json!({})).to_proposal().unwrap();
        assert_eq!(p.proposed, Proposed::Call);
        assert_eq!(p.reasoning, "");

        let p = ToolCall::new(" check ", json!({"reasoning": 5}))
            .to_proposal()
            .unwrap();
        assert_eq!(p.proposed, Proposed::Check);

        let p = ToolCall::new("fold", Value::Null).to_proposal().unwrap();
        assert_eq!(p.proposed, Proposed::Fold);

        let p = ToolCall::new("raise", json!({"amount": 10}))
            .to_proposal()
            .unwrap();
        assert_eq!(p.proposed, Proposed::Raise(Chips::new(10)));
    }

    #[test]
    fn tool_call_amounts() {
        let amount = |v: Value| {
            ToolCall::new("bet", json!({ "amount": v }))
                .to_proposal()
                .map(|p| p.proposed)
        };

        assert_eq!(amount(json!(12.9)), Some(Proposed::Bet(Chips::new(12))));
        assert_eq!(amount(json!("30")), Some(Proposed::Bet(Chips::new(30))));
        assert_eq!(amount(json!(1e12)), Some(Proposed::Bet(Chips::new(u32::MAX))));
        assert_eq!(amount(json!(-1)), None);
        assert_eq!(amount(json!("lots")), None);
        assert_eq!(amount(json!([20])), None);
        assert_eq!(amount(Value::Null), None);
    }

    #[test]
    fn tool_call_unknown() {
        assert!(ToolCall::new("all_in", json!({})).to_proposal().is_none());
        assert!(ToolCall::new("bet", json!({})).to_proposal().is_none());
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::Bet { amount: Chips::new(1_500) }.to_string(), "bet 1,500");
        assert_eq!(Action::Check.to_string(), "check");
        assert_eq!(Action::Fold.label(), "fold");
    }
}
