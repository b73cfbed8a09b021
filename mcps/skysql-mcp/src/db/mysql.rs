//! MariaDB/MySQL session backed by sqlx
//!
//! One un-pooled connection per call, TLS with full certificate and hostname
//! verification. Autocommit is switched on explicitly so an account default of
//! `autocommit=0` cannot roll statements back at close. SQL runs over the text
//! protocol so semicolon-separated statements are executed as sent.
//!
//! The driver has no LOCAL INFILE support; `LOAD DATA LOCAL` statements fail
//! with the server's error.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlDatabaseError, MySqlRow, MySqlSslMode};
use sqlx::{Column, Connection, Either, Executor, Row, ValueRef};

use super::{ConnectTarget, DbError, ResultTable, SqlConnector, SqlOutcome, SqlSession};

/// Connector for SkySQL (MariaDB) services
#[derive(Debug, Clone, Default)]
pub struct MySqlConnector;

#[async_trait]
impl SqlConnector for MySqlConnector {
    async fn connect(&self, target: &ConnectTarget) -> Result<Box<dyn SqlSession>, DbError> {
        let options = MySqlConnectOptions::new()
            .host(&target.host)
            .port(target.port)
            .username(&target.username)
            .password(&target.password)
            .ssl_mode(MySqlSslMode::VerifyIdentity);

        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(db_error)?;

        Ok(Box::new(MySqlSession { conn }))
    }
}

struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl SqlSession for MySqlSession {
    async fn enable_autocommit(&mut self) -> Result<(), DbError> {
        (&mut self.conn)
            .execute(sqlx::raw_sql("SET autocommit=1"))
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn execute(&mut self, sql: &str) -> Result<SqlOutcome, DbError> {
        let mut collector = ResultCollector::default();

        {
            let mut stream = sqlx::raw_sql(sql).fetch_many(&mut self.conn);
            while let Some(step) = stream.try_next().await.map_err(db_error)? {
                match step {
                    Either::Left(done) => collector.statement_done(done.rows_affected()),
                    Either::Right(row) => {
                        if collector.wants_rows() {
                            collector.row(|| column_names(&row), row_text(&row));
                        }
                    }
                }
            }
        }

        let described = if collector.needs_description() {
            self.describe_columns(sql).await
        } else {
            Vec::new()
        };

        Ok(collector.finish(described))
    }

    async fn close(self: Box<Self>) {
        let session = *self;
        if let Err(e) = session.conn.close().await {
            tracing::warn!("failed to close database connection cleanly: {}", e);
        }
    }
}

impl MySqlSession {
    /// Column names of a statement that returned no rows
    ///
    /// Empty result sets carry no row to read metadata from, so the statement
    /// is prepared again to ask for its columns. Statements that cannot be
    /// prepared (several statements, or ones the server only runs as text)
    /// report no columns.
    async fn describe_columns(&mut self, sql: &str) -> Vec<String> {
        match (&mut self.conn).describe(sql).await {
            Ok(describe) => describe
                .columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect(),
            Err(e) => {
                tracing::debug!("statement could not be described: {}", e);
                Vec::new()
            }
        }
    }
}

/// Folds the text-protocol result stream into a single outcome
///
/// The first result set that has rows is kept; later sets are skipped.
/// Affected-row counts are summed over every statement.
#[derive(Debug, Default)]
struct ResultCollector {
    columns: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    first_set_done: bool,
    affected: u64,
}

impl ResultCollector {
    fn wants_rows(&self) -> bool {
        !self.first_set_done
    }

    fn row(&mut self, columns: impl FnOnce() -> Vec<String>, cells: Vec<String>) {
        if self.first_set_done {
            return;
        }
        if self.columns.is_none() {
            self.columns = Some(columns());
        }
        self.rows.push(cells);
    }

    fn statement_done(&mut self, rows_affected: u64) {
        self.affected += rows_affected;
        if self.columns.is_some() {
            self.first_set_done = true;
        }
    }

    /// No rows arrived and nothing changed: possibly an empty result set
    fn needs_description(&self) -> bool {
        self.columns.is_none() && self.affected == 0
    }

    /// `described` supplies column names when no row carried them
    fn finish(self, described: Vec<String>) -> SqlOutcome {
        match self.columns {
            Some(columns) => SqlOutcome::Rows(ResultTable {
                columns,
                rows: self.rows,
            }),
            None if !described.is_empty() => SqlOutcome::Rows(ResultTable {
                columns: described,
                rows: Vec::new(),
            }),
            None => SqlOutcome::Affected(self.affected),
        }
    }
}

fn column_names(row: &MySqlRow) -> Vec<String> {
    row.columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

fn row_text(row: &MySqlRow) -> Vec<String> {
    (0..row.len()).map(|index| cell_text(row, index)).collect()
}

/// Stringify one cell from its text-protocol representation
fn cell_text(row: &MySqlRow, index: usize) -> String {
    match row.try_get_raw(index) {
        Ok(value) if value.is_null() => return "NULL".to_string(),
        Ok(_) => {}
        Err(_) => return "?".to_string(),
    }

    if let Ok(text) = row.try_get_unchecked::<String, _>(index) {
        return text;
    }

    match row.try_get_unchecked::<Vec<u8>, _>(index) {
        Ok(bytes) => format!("<{} bytes>", bytes.len()),
        Err(_) => "?".to_string(),
    }
}

/// Map a sqlx error, keeping the server's native error number
fn db_error(err: sqlx::Error) -> DbError {
    match &err {
        sqlx::Error::Database(db) => {
            let code = db
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(MySqlDatabaseError::number);
            DbError::new(code, db.message())
        }
        _ => DbError::new(None, err.to_string()),
    }
}
