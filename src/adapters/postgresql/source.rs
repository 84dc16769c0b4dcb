//! PostgreSQL attendance source
//!
//! Fetches attendance rows from the extract table and decodes them into
//! domain records.

use super::client::PostgresClient;
use crate::adapters::database::traits::AttendanceSource;
use crate::config::schema::SourceConfig;
use crate::domain::attendance::AttendanceRecord;
use crate::domain::context::ResultExt;
use crate::domain::{CensusError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Attendance source backed by a PostgreSQL extract table
///
/// The extract carries its date and time columns as text, so every row is
/// decoded through [`AttendanceRecord::from_raw`] and malformed rows
/// surface as `CensusError::DataFormat`.
pub struct PostgresAttendanceSource {
    client: PostgresClient,

    /// Site codes in scope; rows for other sites are filtered in the query
    site_codes: Vec<String>,

    /// Optional row cap for debugging
    debug_limit: Option<i64>,

    /// Drop malformed rows with a warning instead of failing the fetch
    skip_invalid_records: bool,
}

impl PostgresAttendanceSource {
    /// Create a new attendance source
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created.
    pub fn new(
        config: &SourceConfig,
        site_codes: Vec<String>,
        skip_invalid_records: bool,
    ) -> Result<Self> {
        Ok(Self {
            client: PostgresClient::new(config.database.clone())?,
            site_codes,
            debug_limit: config.debug_limit,
            skip_invalid_records,
        })
    }

    fn ingestion_query(&self) -> String {
        let mut query = format!(
            "SELECT site_code, department_type_id, \
             arrival_date::text, arrival_time::text, \
             departure_date::text, departure_time::text \
             FROM {} \
             WHERE site_code = ANY($1) AND arrival_date >= $2 \
             ORDER BY arrival_date, arrival_time",
            self.client.config().qualified_table()
        );
        if let Some(limit) = self.debug_limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }
        query
    }
}

#[async_trait]
impl AttendanceSource for PostgresAttendanceSource {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn fetch_attendances(&self, cutoff: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        let query = self.ingestion_query();

        tracing::info!(
            source = %self.client.connection_string_safe(),
            table = %self.client.config().qualified_table(),
            cutoff = %cutoff,
            debug_limit = ?self.debug_limit,
            "Ingesting attendance rows"
        );

        let rows = self
            .client
            .query(&query, &[&self.site_codes, &cutoff])
            .await
            .with_context(|| {
                format!(
                    "ingesting attendances from {}",
                    self.client.config().qualified_table()
                )
            })?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let decoded = decode_row(row).and_then(|fields| {
                AttendanceRecord::from_raw(
                    &fields[0], &fields[1], &fields[2], &fields[3], &fields[4], &fields[5],
                )
            });

            match decoded {
                Ok(record) => records.push(record),
                Err(e) if self.skip_invalid_records => {
                    tracing::warn!(error = %e, "Skipping malformed attendance row");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(count = records.len(), "Attendance rows ingested");
        Ok(records)
    }
}

/// Pull the six raw text fields out of a result row
fn decode_row(row: &tokio_postgres::Row) -> Result<[String; 6]> {
    let mut fields: [String; 6] = Default::default();
    for (i, field) in fields.iter_mut().enumerate() {
        *field = row.try_get::<_, String>(i).map_err(|e| {
            CensusError::DataFormat(format!("column {i} could not be read as text: {e}"))
        })?;
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::config::schema::DatabaseConfig;

    fn source(debug_limit: Option<i64>) -> PostgresAttendanceSource {
        let config = SourceConfig {
            database: DatabaseConfig {
                connection_string: secret_string(
                    "postgresql://census:pw@localhost/ecds".to_string(),
                ),
                schema: "ecds".to_string(),
                table: "attendances".to_string(),
                max_connections: 2,
                connection_timeout_seconds: 5,
                statement_timeout_seconds: 5,
            },
            debug_limit,
        };
        PostgresAttendanceSource::new(&config, vec!["RAL26".to_string()], false).unwrap()
    }

    #[test]
    fn test_ingestion_query_shape() {
        let query = source(None).ingestion_query();
        assert!(query.contains("FROM ecds.attendances"));
        assert!(query.contains("arrival_date >= $2"));
        assert!(query.contains("site_code = ANY($1)"));
        assert!(!query.contains("LIMIT"));
    }

    #[test]
    fn test_ingestion_query_debug_limit() {
        let query = source(Some(10)).ingestion_query();
        assert!(query.ends_with("LIMIT 10"));
    }
}
