// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Database types for persisting hands and seats state.
use anyhow::Result;
use log::error;
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use std::{path::Path, sync::Arc};
use tokio::{sync::mpsc, task::JoinHandle};

use riverboat_core::poker::{Chips, SeatId};

use crate::observer::{HandEvent, Observer, Snapshot};

/// A database seat row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRow {
    /// The seat id.
    pub seat: SeatId,
    /// The seat name.
    pub name: String,
    /// The decision maker label.
    pub model: String,
    /// The seat chips.
    pub chips: Chips,
    /// The seat notes.
    pub notes: String,
}

/// A database event row.
#[derive(Debug, Clone)]
pub struct EventRow {
    /// The hand number.
    pub hand: u32,
    /// The event sequence number in the hand.
    pub seq: u32,
    /// The event kind.
    pub kind: String,
    /// The event as JSON.
    pub event: String,
    /// The pot after the event.
    pub pot: Chips,
}

/// Database for persisting hands and seats state.
#[derive(Debug, Clone)]
pub struct Db {
    db: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open a database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Create tables
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS seats (
               id INTEGER PRIMARY KEY,
               name TEXT NOT NULL,
               model TEXT NOT NULL,
               chips INTEGER NOT NULL,
               notes TEXT NOT NULL,
               created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
               last_update DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS events (
               hand INTEGER NOT NULL,
               seq INTEGER NOT NULL,
               kind TEXT NOT NULL,
               event TEXT NOT NULL,
               snapshot TEXT NOT NULL,
               pot INTEGER NOT NULL,
               created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
               PRIMARY KEY (hand, seq)
            );",
        )?;

        Ok(Db {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// The last hand number stored in the database, 0 if there are none.
    pub async fn last_hand(&self) -> Result<u32> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let db = db.lock();
            let hand = db.query_row("SELECT COALESCE(MAX(hand), 0) FROM events", (), |row| {
                row.get::<usize, u32>(0)
            })?;
            Ok(hand)
        })
        .await?
    }

    /// Stores a batch of hand events in a transaction.
    async fn insert_events(&self, events: Vec<EventEntry>) -> Result<()> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let mut db = db.lock();

            let tx = db.transaction()?;

            for e in events {
                tx.execute(
                    "INSERT INTO events (hand, seq, kind, event, snapshot, pot)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![e.hand, e.seq, e.kind, e.event, e.snapshot, e.pot],
                )?;
            }

            tx.commit()?;

            Ok(())
        })
        .await?
    }

    /// Loads the events of a hand in sequence order.
    pub async fn hand_events(&self, hand: u32) -> Result<Vec<EventRow>> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let db = db.lock();

            let mut stmt = db.prepare(
                "SELECT hand, seq, kind, event, pot
                 FROM events
                 WHERE hand = ?1
                 ORDER BY seq",
            )?;

            let rows = stmt.query_map(params![hand], |row| {
                Ok(EventRow {
                    hand: row.get(0)?,
                    seq: row.get(1)?,
                    kind: row.get(2)?,
                    event: row.get(3)?,
                    pot: Chips::new(row.get(4)?),
                })
            })?;

            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await?
    }

    /// Inserts or updates seats state.
    pub async fn update_seats(&self, seats: Vec<SeatRow>) -> Result<()> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let mut db = db.lock();

            let tx = db.transaction()?;

            for seat in seats {
                tx.execute(
                    "INSERT INTO seats (id, name, model, chips, notes, last_update)
                     VALUES (?1, ?2, ?3, ?4, ?5, CURRENT_TIMESTAMP)
                     ON CONFLICT(id) DO UPDATE SET
                       name = excluded.name,
                       model = excluded.model,
                       chips = excluded.chips,
                       notes = excluded.notes,
                       last_update = CURRENT_TIMESTAMP",
                    params![
                        seat.seat.index() as u32,
                        seat.name,
                        seat.model,
                        seat.chips.amount(),
                        seat.notes
                    ],
                )?;
            }

            tx.commit()?;

            Ok(())
        })
        .await?
    }

    /// Loads all seats.
    pub async fn seats(&self) -> Result<Vec<SeatRow>> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let db = db.lock();

            let mut stmt = db.prepare(
                "SELECT id, name, model, chips, notes
                 FROM seats
                 ORDER BY id",
            )?;

            let rows = stmt.query_map((), |row| {
                Ok(SeatRow {
                    seat: SeatId::from(row.get::<usize, u32>(0)? as usize),
                    name: row.get(1)?,
                    model: row.get(2)?,
                    chips: Chips::new(row.get(3)?),
                    notes: row.get(4)?,
                })
            })?;

            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await?
    }
}

/// A serialized event waiting to be written.
#[derive(Debug)]
struct EventEntry {
    hand: u32,
    seq: u32,
    kind: &'static str,
    event: String,
    snapshot: String,
    pot: u32,
}

/// An observer that stores hand events in the database.
///
/// Events are queued to a writer task, the engine never waits on the
/// database.
#[derive(Debug)]
pub struct DbObserver {
    tx: mpsc::UnboundedSender<EventEntry>,
    hand: u32,
    seq: u32,
}

/// The task writing events queued by a [DbObserver].
#[derive(Debug)]
pub struct DbWriter {
    handle: JoinHandle<()>,
}

impl DbObserver {
    /// Max events written in one transaction.
    const BATCH_SIZE: usize = 64;

    /// Creates an observer that numbers hands after the ones in the database
    /// and the task that writes its events.
    pub async fn spawn(db: Db) -> Result<(Self, DbWriter)> {
        let hand = db.last_hand().await?;
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::write_events(db, rx));

        Ok((Self { tx, hand, seq: 0 }, DbWriter { handle }))
    }

    async fn write_events(db: Db, mut rx: mpsc::UnboundedReceiver<EventEntry>) {
        let mut batch = Vec::with_capacity(Self::BATCH_SIZE);
        while rx.recv_many(&mut batch, Self::BATCH_SIZE).await > 0 {
            let count = batch.len();
            if let Err(e) = db.insert_events(std::mem::take(&mut batch)).await {
                error!("Db insert of {count} events failed {e}");
            }
        }
    }
}

impl DbWriter {
    /// Waits for all queued events to be written.
    ///
    /// The observer must be dropped first, the writer stops when its queue
    /// is closed and empty.
    pub async fn flush(self) -> Result<()> {
        self.handle.await?;
        Ok(())
    }
}

impl Observer for DbObserver {
    fn observe(&mut self, event: &HandEvent, snapshot: &Snapshot) {
        if matches!(event, HandEvent::HandStarted { .. }) {
            self.hand += 1;
            self.seq = 0;
        }

        let entry = serde_json::to_string(event).and_then(|json| {
            Ok(EventEntry {
                hand: self.hand,
                seq: self.seq,
                kind: event.kind(),
                event: json,
                snapshot: serde_json::to_string(snapshot)?,
                pot: snapshot.pot.amount(),
            })
        });

        match entry {
            Ok(entry) => {
                if self.tx.send(entry).is_err() {
                    error!("Db writer stopped, event {} dropped", event.kind());
                }
            }
            Err(e) => error!("Event {} serialize failed {e}", event.kind()),
        }

        self.seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverboat_core::poker::Street;

    fn snapshot(pot: u32) -> Snapshot {
        Snapshot {
            stacks: vec![(SeatId::new(0), Chips::new(100))],
            board: vec![],
            active_seat: Some(SeatId::new(0)),
            pot: Chips::new(pot),
            street: Street::Preflop,
        }
    }

    #[tokio::test]
    async fn observer_numbers_hands() {
        let db = Db::open_in_memory().unwrap();
        let (mut observer, writer) = DbObserver::spawn(db.clone()).await.unwrap();

        for _ in 0..2 {
            let started = HandEvent::HandStarted {
                button: SeatId::new(0),
                seats: vec![SeatId::new(0), SeatId::new(1)],
            };
            observer.observe(&started, &snapshot(0));
            observer.observe(&HandEvent::StreetAdvanced { street: Street::Preflop }, &snapshot(15));
        }

        drop(observer);
        writer.flush().await.unwrap();
        assert_eq!(db.last_hand().await.unwrap(), 2);

        let events = db.hand_events(2).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, "hand_started");
        assert_eq!(events[1].seq, 1);
        assert_eq!(events[1].pot, Chips::new(15));
        assert!(events[1].event.contains("Preflop"));

        // A new observer continues from the last hand.
        let (mut observer, writer) = DbObserver::spawn(db.clone()).await.unwrap();
        observer.observe(
            &HandEvent::HandStarted {
                button: SeatId::new(1),
                seats: vec![],
            },
            &snapshot(0),
        );
        drop(observer);
        writer.flush().await.unwrap();
        assert_eq!(db.last_hand().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn flush_writes_all_batches() {
        let db = Db::open_in_memory().unwrap();
        let (mut observer, writer) = DbObserver::spawn(db.clone()).await.unwrap();

        let started = HandEvent::HandStarted {
            button: SeatId::new(0),
            seats: vec![SeatId::new(0)],
        };
        observer.observe(&started, &snapshot(0));
        for pot in 1..200 {
            observer.observe(&HandEvent::StreetAdvanced { street: Street::Flop }, &snapshot(pot));
        }

        drop(observer);
        writer.flush().await.unwrap();

        let events = db.hand_events(1).await.unwrap();
        assert_eq!(events.len(), 200);
        assert!(events.iter().enumerate().all(|(i, e)| e.seq == i as u32));
        assert_eq!(events[199].pot, Chips::new(199));
    }

    #[tokio::test]
    async fn update_seats() {
        let db = Db::open_in_memory().unwrap();
        let mut row = SeatRow {
            seat: SeatId::new(1),
            name: "Alice".to_string(),
            model: "always-call".to_string(),
            chips: Chips::new(2_000),
            notes: String::default(),
        };

        db.update_seats(vec![row.clone()]).await.unwrap();

        row.chips = Chips::new(1_250);
        row.notes = "Seat 2 bluffs the river".to_string();
        db.update_seats(vec![row.clone()]).await.unwrap();

        let seats = db.seats().await.unwrap();
        assert_eq!(seats, vec![row]);
    }
}
