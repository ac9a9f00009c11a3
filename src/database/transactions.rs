// ABOUTME: RAII transaction guard for multi-statement SQLite writes
// ABOUTME: Rolls back automatically when dropped without an explicit commit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Transaction guard
//!
//! ```text
//! let mut guard = TransactionGuard::begin(&pool).await?;
//! sqlx::query("DELETE FROM recipe_tags ...").execute(guard.executor()?).await?;
//! sqlx::query("INSERT INTO recipe_tags ...").execute(guard.executor()?).await?;
//! guard.commit().await?;
//! ```
//!
//! Returning early with `?` before `commit()` drops the guard and sqlx rolls
//! the transaction back.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// RAII guard for a `SQLite` transaction
pub struct TransactionGuard<'c> {
    transaction: Option<Transaction<'c, Sqlite>>,
}

impl TransactionGuard<'static> {
    /// Begin a transaction on a pooled connection
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or `BEGIN` fails
    pub async fn begin(pool: &SqlitePool) -> AppResult<Self> {
        let transaction = pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(Self::new(transaction))
    }
}

impl<'c> TransactionGuard<'c> {
    /// Wrap an existing transaction
    #[must_use]
    pub fn new(transaction: Transaction<'c, Sqlite>) -> Self {
        debug!("TransactionGuard created");
        Self {
            transaction: Some(transaction),
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails or the guard was already consumed
    pub async fn commit(mut self) -> AppResult<()> {
        let transaction = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;
        transaction
            .commit()
            .await
            .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
        debug!("TransactionGuard committed");
        Ok(())
    }

    /// Connection to run statements on
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already committed
    pub fn executor(&mut self) -> AppResult<&mut SqliteConnection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit")
        })
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            warn!("TransactionGuard dropped without commit - rolling back");
        }
    }
}
