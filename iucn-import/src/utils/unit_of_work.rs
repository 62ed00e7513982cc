//! Run-wide unit of work
//!
//! Wraps the single transaction that stages every write of an import run.
//! Nothing becomes visible until `commit`; dropping the unit of work on an
//! error path rolls the transaction back.

use iucn_common::Result;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::time::Instant;

/// Transaction wrapper that logs how long the run's writes were staged
pub struct UnitOfWork {
    tx: Option<Transaction<'static, Sqlite>>,
    started_at: Instant,
}

impl UnitOfWork {
    /// Begin the run's transaction
    pub async fn begin(pool: &SqlitePool) -> Result<Self> {
        let start = Instant::now();
        tracing::debug!("Connection acquisition requested");

        let tx = pool.begin().await?;

        tracing::debug!(
            wait_ms = start.elapsed().as_millis() as u64,
            "Unit of work started"
        );

        Ok(Self {
            tx: Some(tx),
            started_at: Instant::now(),
        })
    }

    /// Connection all staged statements run on
    pub fn connection(&mut self) -> &mut SqliteConnection {
        match self.tx.as_mut() {
            Some(tx) => &mut **tx,
            // `commit` and `rollback` consume self
            None => unreachable!("unit of work used after completion"),
        }
    }

    /// Commit every staged write
    pub async fn commit(mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }

        tracing::info!(
            held_ms = self.started_at.elapsed().as_millis() as u64,
            "Unit of work committed"
        );
        Ok(())
    }

    /// Discard every staged write
    pub async fn rollback(mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }

        tracing::warn!(
            held_ms = self.started_at.elapsed().as_millis() as u64,
            "Unit of work rolled back"
        );
        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.tx.is_some() {
            // sqlx rolls the transaction back when it is dropped
            tracing::warn!(
                held_ms = self.started_at.elapsed().as_millis() as u64,
                "Unit of work dropped without commit, staged writes discarded"
            );
        }
    }
}
