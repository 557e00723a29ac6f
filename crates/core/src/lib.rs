// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker core types shared by the engine and decision makers.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod action;
pub mod decision;
pub mod poker;
pub mod view;
