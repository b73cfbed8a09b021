//! Direct database access for the SQL bridge
//!
//! The bridge talks to the driver through [`SqlConnector`] and [`SqlSession`]
//! so that connection handling can be exercised without a live database.
//! [`execute_once`] owns the session lifecycle: one connection, autocommit
//! switched on, one execution, and a close on every exit path.

pub mod mysql;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub use mysql::MySqlConnector;

/// Where and as whom to connect
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Column names plus stringified rows of a result set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// What a statement produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlOutcome {
    /// A result set with column metadata
    Rows(ResultTable),
    /// No result set; number of rows changed
    Affected(u64),
}

/// A driver error with its native error number when one was reported
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DbError {
    pub code: Option<u16>,
    pub message: String,
}

impl DbError {
    pub fn new(code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Opens database sessions
#[async_trait]
pub trait SqlConnector: Send + Sync {
    async fn connect(&self, target: &ConnectTarget) -> Result<Box<dyn SqlSession>, DbError>;
}

/// An open database connection
#[async_trait]
pub trait SqlSession: Send {
    /// Make every statement commit on its own, whatever the account default
    async fn enable_autocommit(&mut self) -> Result<(), DbError>;

    /// Run the SQL text verbatim
    async fn execute(&mut self, sql: &str) -> Result<SqlOutcome, DbError>;

    /// Release the connection
    async fn close(self: Box<Self>);
}

/// Which stage of the bridge failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlFailure {
    Connect(DbError),
    Query(DbError),
}

/// Connect, run `sql` once, and close the session regardless of the outcome
pub async fn execute_once(
    connector: &dyn SqlConnector,
    target: &ConnectTarget,
    sql: &str,
) -> Result<SqlOutcome, SqlFailure> {
    tracing::debug!(host = %target.host, port = target.port, "opening database connection");

    let mut session = connector.connect(target).await.map_err(|e| {
        tracing::error!(code = ?e.code, "database connection failed: {}", e.message);
        SqlFailure::Connect(e)
    })?;

    if let Err(e) = session.enable_autocommit().await {
        tracing::error!(code = ?e.code, "enabling autocommit failed: {}", e.message);
        session.close().await;
        return Err(SqlFailure::Connect(e));
    }

    let result = session.execute(sql).await;
    session.close().await;

    result.map_err(|e| {
        tracing::error!(code = ?e.code, "query execution failed: {}", e.message);
        SqlFailure::Query(e)
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording test double for the SQL bridge

    use std::sync::{Arc, Mutex};

    use super::*;

    /// Shared record of what the double saw
    #[derive(Debug, Default)]
    pub struct Recording {
        pub targets: Vec<ConnectTarget>,
        pub executed: Vec<String>,
        pub closes: usize,
        /// Session calls in order: "autocommit", "execute", "close"
        pub calls: Vec<&'static str>,
    }

    /// Connector whose behavior is scripted per test
    #[derive(Clone)]
    pub struct RecordingConnector {
        pub recording: Arc<Mutex<Recording>>,
        connect_error: Option<DbError>,
        autocommit_error: Option<DbError>,
        outcome: Result<SqlOutcome, DbError>,
    }

    impl RecordingConnector {
        pub fn returning(outcome: Result<SqlOutcome, DbError>) -> Self {
            Self {
                recording: Arc::default(),
                connect_error: None,
                autocommit_error: None,
                outcome,
            }
        }

        /// Connects, but fails to switch autocommit on
        pub fn without_autocommit(error: DbError) -> Self {
            Self {
                autocommit_error: Some(error),
                ..Self::returning(Ok(SqlOutcome::Affected(0)))
            }
        }

        pub fn refusing(error: DbError) -> Self {
            Self {
                connect_error: Some(error),
                ..Self::returning(Ok(SqlOutcome::Affected(0)))
            }
        }

        pub fn targets(&self) -> Vec<ConnectTarget> {
            self.recording.lock().unwrap().targets.clone()
        }

        pub fn executed(&self) -> Vec<String> {
            self.recording.lock().unwrap().executed.clone()
        }

        pub fn closes(&self) -> usize {
            self.recording.lock().unwrap().closes
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.recording.lock().unwrap().calls.clone()
        }
    }

    struct RecordingSession {
        recording: Arc<Mutex<Recording>>,
        autocommit_error: Option<DbError>,
        outcome: Result<SqlOutcome, DbError>,
    }

    #[async_trait]
    impl SqlConnector for RecordingConnector {
        async fn connect(&self, target: &ConnectTarget) -> Result<Box<dyn SqlSession>, DbError> {
            self.recording.lock().unwrap().targets.push(target.clone());
            if let Some(err) = &self.connect_error {
                return Err(err.clone());
            }
            Ok(Box::new(RecordingSession {
                recording: self.recording.clone(),
                autocommit_error: self.autocommit_error.clone(),
                outcome: self.outcome.clone(),
            }))
        }
    }

    #[async_trait]
    impl SqlSession for RecordingSession {
        async fn enable_autocommit(&mut self) -> Result<(), DbError> {
            self.recording.lock().unwrap().calls.push("autocommit");
            match &self.autocommit_error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        async fn execute(&mut self, sql: &str) -> Result<SqlOutcome, DbError> {
            let mut recording = self.recording.lock().unwrap();
            recording.calls.push("execute");
            recording.executed.push(sql.to_string());
            self.outcome.clone()
        }

        async fn close(self: Box<Self>) {
            let mut recording = self.recording.lock().unwrap();
            recording.calls.push("close");
            recording.closes += 1;
        }
    }
}
