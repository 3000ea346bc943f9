// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Busy-Retry Transaction Helper
//!
//! SQLite serializes writers; under concurrent load a transaction can fail
//! with `SQLITE_BUSY`/`SQLITE_LOCKED` rather than blocking indefinitely.
//! `run_in_transaction` retries those specific conditions with a linear
//! backoff and surfaces everything else immediately.

use sas_domain::IngestError;
use sqlx::SqlitePool;
use std::future::Future;
use std::time::Duration;

const DEFAULT_MAX_RETRIES: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_millis(20);

/// True for the specific SQLite error codes that mean "try again", as
/// opposed to a genuine constraint violation or corruption.
fn is_busy(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.code().as_deref(), Some("5") | Some("6"))
        }
        _ => false,
    }
}

/// Runs `body` inside a transaction, retrying on `SQLITE_BUSY`/`SQLITE_LOCKED`
/// up to `max_retries` times with a small linear backoff between attempts.
pub async fn run_in_transaction<F, Fut, T>(
    pool: &SqlitePool,
    max_retries: u32,
    mut body: F,
) -> Result<T, IngestError>
where
    F: FnMut(&mut sqlx::Transaction<'_, sqlx::Sqlite>) -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt = 0;
    loop {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| IngestError::Database(format!("failed to open transaction: {e}")))?;

        match body(&mut tx).await {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| IngestError::Database(format!("failed to commit transaction: {e}")))?;
                return Ok(value);
            }
            Err(err) if is_busy(&err) && attempt < max_retries => {
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY * attempt).await;
                continue;
            }
            Err(err) => {
                return Err(IngestError::Database(format!("transaction failed: {err}")));
            }
        }
    }
}

pub async fn run_in_transaction_default<F, Fut, T>(pool: &SqlitePool, body: F) -> Result<T, IngestError>
where
    F: FnMut(&mut sqlx::Transaction<'_, sqlx::Sqlite>) -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    run_in_transaction(pool, DEFAULT_MAX_RETRIES, body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_busy_and_locked_codes() {
        // sqlx's Database error variant can't be constructed directly in
        // tests without a live driver error; the predicate is exercised
        // end-to-end by the repository integration tests instead.
        assert!(!is_busy(&sqlx::Error::RowNotFound));
    }
}
