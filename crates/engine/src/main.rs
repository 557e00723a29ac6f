// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{error, info};
use rand::{SeedableRng, rngs::StdRng};
use std::{path::PathBuf, time::Duration};

use riverboat_bot::{AlwaysCallOrCheck, NICKNAMES, RandomAgent};
use riverboat_core::{
    decision::DecisionMaker,
    poker::{Chips, SeatId},
};
use riverboat_engine::{
    Config, Observer, Seat, Table,
    db::{Db, DbObserver, SeatRow},
};

/// The bots strategy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Always call or check.
    Call,
    /// Random actions.
    Random,
}

#[derive(Debug, Parser)]
struct Cli {
    /// Number of seats at the table.
    #[clap(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(2..=10))]
    seats: u8,
    /// Number of hands to play.
    #[clap(long, default_value_t = 3)]
    hands: usize,
    /// The starting stack.
    #[clap(long, default_value_t = 2_000)]
    stack: u32,
    /// The small blind.
    #[clap(long, default_value_t = 5)]
    small_blind: u32,
    /// The big blind.
    #[clap(long, default_value_t = 10)]
    big_blind: u32,
    /// The minimum raise.
    #[clap(long, default_value_t = 5)]
    min_raise: u32,
    /// Decision timeout in seconds.
    #[clap(long, default_value_t = 30)]
    timeout: u64,
    /// Seed for shuffling decks.
    #[clap(long)]
    seed: Option<u64>,
    /// Database path for storing hands and seats.
    #[clap(long)]
    db: Option<PathBuf>,
    /// The bots strategy.
    #[clap(long, value_enum, default_value_t = Strategy::Call)]
    strategy: Strategy,
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e}");
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config {
        small_blind: Chips::new(cli.small_blind),
        big_blind: Chips::new(cli.big_blind),
        min_raise: Chips::new(cli.min_raise),
        starting_stack: Chips::new(cli.stack),
        action_timeout: Duration::from_secs(cli.timeout),
        summary_timeout: Duration::from_secs(cli.timeout),
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let seats = (0..cli.seats as usize)
        .map(|i| {
            let dm: Box<dyn DecisionMaker> = match cli.strategy {
                Strategy::Call => Box::new(AlwaysCallOrCheck),
                Strategy::Random => Box::new(RandomAgent::new(cli.seed.unwrap_or_default() + i as u64)),
            };
            let name = NICKNAMES[i % NICKNAMES.len()];
            Seat::new(SeatId::from(i), name, config.starting_stack, dm)
        })
        .collect::<Vec<_>>();

    let db = cli.db.as_ref().map(Db::open).transpose()?;
    let mut writer = None;
    let observer: Box<dyn Observer> = match &db {
        Some(db) => {
            let (observer, db_writer) = DbObserver::spawn(db.clone()).await?;
            writer = Some(db_writer);
            Box::new(observer)
        }
        None => Box::new(()),
    };

    let mut table = Table::new(config, seats, observer)?;
    let summaries = table.run(cli.hands, &mut rng).await;
    info!("Played {} of {} hands", summaries.len(), cli.hands);

    for seat in table.seats() {
        info!("{} ({}) ends with {} chips", seat.name, seat.label(), seat.chips);
    }

    let rows = table
        .seats()
        .iter()
        .map(|s| SeatRow {
            seat: s.seat_id,
            name: s.name.clone(),
            model: s.label().to_string(),
            chips: s.chips,
            notes: s.notes.clone(),
        })
        .collect::<Vec<_>>();

    // Closes the observer queue.
    drop(table);

    if let Some(writer) = writer {
        writer.flush().await?;
    }

    if let Some(db) = db {
        db.update_seats(rows).await?;
    }

    Ok(())
}
