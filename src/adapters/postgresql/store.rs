//! PostgreSQL census store
//!
//! Persists census rows with replace-by-week semantics: every stored week
//! the new output covers is deleted before the new rows are inserted, so a
//! re-run over the same window fully supersedes earlier results.

use super::client::PostgresClient;
use crate::adapters::database::traits::CensusStore;
use crate::config::schema::TargetConfig;
use crate::domain::census::CensusRow;
use crate::domain::context::ResultExt;
use crate::domain::{CensusError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Census store backed by a PostgreSQL reporting table
pub struct PostgresCensusStore {
    client: PostgresClient,

    /// Rows per insert transaction
    chunk_size: usize,
}

impl PostgresCensusStore {
    /// Create a new census store
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created.
    pub fn new(config: &TargetConfig) -> Result<Self> {
        Ok(Self {
            client: PostgresClient::new(config.database.clone())?,
            chunk_size: config.chunk_size,
        })
    }

    fn create_table_sql(&self) -> String {
        format!(
            "CREATE SCHEMA IF NOT EXISTS {schema}; \
             CREATE TABLE IF NOT EXISTS {table} (\
                 date_activity DATE NOT NULL, \
                 hour INT NOT NULL, \
                 site_code TEXT NOT NULL, \
                 department_type_id TEXT NOT NULL, \
                 count_patients INT NOT NULL, \
                 count_arrivals INT NOT NULL, \
                 fin_year TEXT NOT NULL, \
                 fin_month INT NOT NULL, \
                 month_name TEXT NOT NULL, \
                 date_weekstarting DATE NOT NULL, \
                 date_weekending DATE NOT NULL, \
                 shorthand TEXT NOT NULL, \
                 department_type_desc TEXT NOT NULL, \
                 PRIMARY KEY (date_activity, hour, site_code, department_type_id)\
             )",
            schema = self.client.config().schema,
            table = self.client.config().qualified_table(),
        )
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (\
                 date_activity, hour, site_code, department_type_id, \
                 count_patients, count_arrivals, fin_year, fin_month, \
                 month_name, date_weekstarting, date_weekending, \
                 shorthand, department_type_desc\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            self.client.config().qualified_table()
        )
    }
}

#[async_trait]
impl CensusStore for PostgresCensusStore {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_table_exists(&self) -> Result<()> {
        let client = self.client.get_connection().await?;
        client
            .batch_execute(&self.create_table_sql())
            .await
            .map_err(|e| {
                CensusError::Database(format!("Failed to create census table: {}", e))
            })?;

        tracing::debug!(
            table = %self.client.config().qualified_table(),
            "Census table ready"
        );
        Ok(())
    }

    async fn replace_weeks(
        &self,
        min_weekstarting: NaiveDate,
        rows: &[CensusRow],
        dry_run: bool,
    ) -> Result<u64> {
        if dry_run {
            tracing::info!(
                rows = rows.len(),
                min_weekstarting = %min_weekstarting,
                "Dry run - skipping delete and insert"
            );
            return Ok(0);
        }

        let delete_sql = format!(
            "DELETE FROM {} WHERE date_weekstarting >= $1",
            self.client.config().qualified_table()
        );
        let deleted = self
            .client
            .execute(&delete_sql, &[&min_weekstarting])
            .await
            .with_context(|| format!("deleting stored census weeks from {min_weekstarting}"))?;
        tracing::info!(
            deleted,
            min_weekstarting = %min_weekstarting,
            "Removed overlapping census rows"
        );

        let insert_sql = self.insert_sql();
        let mut inserted: u64 = 0;

        for chunk in rows.chunks(self.chunk_size) {
            let mut conn = self.client.get_connection().await?;
            let tx = conn.transaction().await.map_err(|e| {
                CensusError::Database(format!("Failed to begin transaction: {}", e))
            })?;

            for row in chunk {
                let hour = row.hour as i32;
                let count_patients = row.count_patients as i32;
                let count_arrivals = row.count_arrivals as i32;
                let fin_month = row.fin_month as i32;

                tx.execute(
                    &insert_sql,
                    &[
                        &row.date_activity,
                        &hour,
                        &row.site_code.as_str(),
                        &row.department_type_id.as_str(),
                        &count_patients,
                        &count_arrivals,
                        &row.fin_year,
                        &fin_month,
                        &row.month_name,
                        &row.date_weekstarting,
                        &row.date_weekending,
                        &row.shorthand,
                        &row.department_type_desc,
                    ],
                )
                .await
                .map_err(|e| {
                    CensusError::Database(format!("Failed to insert census row: {}", e))
                })?;
            }

            tx.commit().await.map_err(|e| {
                CensusError::Database(format!("Failed to commit insert chunk: {}", e))
            })?;

            inserted += chunk.len() as u64;
            tracing::debug!(inserted, total = rows.len(), "Census rows uploaded");
        }

        tracing::info!(inserted, "Census upload complete");
        Ok(inserted)
    }
}
