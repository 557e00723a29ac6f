// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Engine errors.
use thiserror::Error;

use riverboat_core::poker::SeatId;

/// Errors that stop a hand from being played.
///
/// These are configuration and input errors, a broken engine invariant is a
/// bug and panics instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer than two seats can be dealt in.
    #[error("A hand needs at least 2 seats with chips and a decision maker, found {0}")]
    NotEnoughSeats(usize),
    /// The button is not a table seat.
    #[error("Button seat {button} is out of range for a table with {seats} seats")]
    InvalidButton {
        /// The requested button.
        button: SeatId,
        /// The number of table seats.
        seats: usize,
    },
    /// A seat id doesn't match its table position.
    #[error("Seat at position {position} has id {seat}")]
    SeatMismatch {
        /// The table position.
        position: usize,
        /// The seat id found at that position.
        seat: SeatId,
    },
    /// The deck ran out of cards while dealing.
    #[error("The deck ran out of cards")]
    DeckExhausted,
}

/// Engine result type.
pub type Result<T> = std::result::Result<T, Error>;
