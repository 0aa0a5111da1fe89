// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Relational persistence for managed resources and their child rows.
//!
//! Queries use `?` placeholders so the same statements run on MySQL (production)
//! and SQLite (tests) through the `Any` driver.

pub mod pod;
pub mod svc;

pub use pod::PodStore;
pub use svc::SvcStore;

use crate::error::{PaasError, Result};
use crate::types::ManagedResource;
use sqlx::any::{AnyPoolOptions, AnyQueryResult};
use sqlx::{AnyConnection, AnyPool};
use std::future::Future;
use tracing::{error, info, instrument};

const MAX_CONNECTIONS: u32 = 10;

/// CRUD over one resource kind. `delete_by_id` removes the parent row and all of its
/// child rows in a single transaction.
pub trait ResourceStore: Send + Sync {
    type Resource: ManagedResource;

    /// Create the kind's tables if they do not exist yet
    fn init_tables(&self) -> impl Future<Output = Result<()>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Self::Resource>>> + Send;

    /// Insert the resource and its children, returning the new id
    fn create(&self, resource: &Self::Resource) -> impl Future<Output = Result<i64>> + Send;

    /// Merge the non-default fields of `resource` over the stored row
    fn update(&self, resource: &Self::Resource) -> impl Future<Output = Result<()>> + Send;

    fn delete_by_id(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// All stored resources, empty when there are none
    fn find_all(&self) -> impl Future<Output = Result<Vec<Self::Resource>>> + Send;
}

/// Connect to the database at `url` (`mysql://...` or `sqlite:...`)
pub async fn connect(url: &str) -> Result<AnyPool> {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(url)
        .await?;
    Ok(pool)
}

/// DDL for an auto-incrementing primary key on the connected backend
async fn id_column(pool: &AnyPool) -> Result<&'static str> {
    let conn = pool.acquire().await?;
    match conn.backend_name() {
        "MySQL" => Ok("id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY"),
        "SQLite" => Ok("id INTEGER PRIMARY KEY AUTOINCREMENT"),
        other => Err(PaasError::Config(format!(
            "Unsupported database backend: {}",
            other
        ))),
    }
}

/// Run each `CREATE TABLE IF NOT EXISTS` statement; `{id}` is replaced by the backend's key DDL
#[instrument(skip(pool, statements))]
pub(crate) async fn create_tables(pool: &AnyPool, kind: &str, statements: &[&str]) -> Result<()> {
    let id = id_column(pool).await?;
    for statement in statements {
        sqlx::query(&statement.replace("{id}", id))
            .execute(pool)
            .await?;
    }
    info!("Tables for {} initialized", kind);
    Ok(())
}

/// Delete the parent row and every child row pointing at it, all or nothing.
///
/// Any error rolls the transaction back explicitly; a panic drops the uncommitted
/// transaction, which rolls it back as well.
#[instrument(skip(pool, children))]
pub(crate) async fn delete_cascade(
    pool: &AnyPool,
    table: &str,
    children: &[(&str, &str)],
    id: i64,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let outcome = async {
        sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for (child_table, foreign_key) in children {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE {} = ?",
                child_table, foreign_key
            ))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }
        Ok::<_, sqlx::Error>(())
    }
    .await;

    match outcome {
        Ok(()) => {
            tx.commit().await?;
            info!("Deleted {} row {} and its children", table, id);
            Ok(())
        }
        Err(e) => {
            error!("Deleting {} row {} failed, rolling back: {}", table, id, e);
            if let Err(rollback) = tx.rollback().await {
                error!("Rollback of {} row {} delete failed: {}", table, id, rollback);
            }
            Err(e.into())
        }
    }
}

/// Id of the row an `INSERT` just created on `conn`.
///
/// The `Any` driver only reports it for MySQL; otherwise the backend is asked on the
/// same connection, which still holds the insert's transaction.
pub(crate) async fn inserted_id(conn: &mut AnyConnection, result: &AnyQueryResult) -> Result<i64> {
    if let Some(id) = result.last_insert_id() {
        return Ok(id);
    }

    let sql = match conn.backend_name() {
        "SQLite" => "select last_insert_rowid()",
        "MySQL" => "select cast(last_insert_id() as signed)",
        other => {
            return Err(PaasError::Config(format!(
                "Unsupported database backend: {}",
                other
            )))
        }
    };
    let (id,): (i64,) = sqlx::query_as(sql).fetch_one(&mut *conn).await?;
    Ok(id)
}

/// Integer columns are stored as BIGINT; narrow them back to the model's width
pub(crate) fn narrow(value: i64, column: &str) -> Result<i32> {
    i32::try_from(value).map_err(|e| {
        PaasError::Database(sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
}

/// Count rows of `table` matching `column = value`, used by tests to observe cascades
#[cfg(test)]
pub(crate) async fn count_rows(pool: &AnyPool, table: &str, column: &str, value: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?",
        table, column
    ))
    .bind(value)
    .fetch_one(pool)
    .await
    .unwrap();
    count
}
