//! SQL execution handler
//!
//! Resolves fresh credentials for the service on every call, then runs the
//! caller's SQL verbatim over a direct connection. The SQL is not validated,
//! quoted or restricted; running arbitrary statements is the purpose of the
//! tool and callers must treat it as a privileged capability.

use super::{resolve_credentials, ToolContext, ToolError};
use crate::db::{execute_once, SqlOutcome};

/// Execute SQL against a service's database
pub async fn execute_sql(
    ctx: &ToolContext,
    service_id: &str,
    sql_query: &str,
) -> Result<SqlOutcome, ToolError> {
    let credentials = resolve_credentials(ctx, service_id).await?;

    let target = credentials
        .connect_target()
        .map_err(|missing| ToolError::MissingData {
            service_id: service_id.to_string(),
            missing,
        })?;

    tracing::info!(service_id, host = %target.host, "executing SQL");

    execute_once(ctx.connector.as_ref(), &target, sql_query)
        .await
        .map_err(ToolError::from)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context_with;
    use super::*;
    use crate::db::testing::RecordingConnector;
    use crate::db::{ConnectTarget, DbError, ResultTable};

    const SERVICES: &str = r#"[
        {"id": "svc-1", "name": "alpha", "fqdn": "h", "endpoints": [{"ports": [{"port": 4000}]}]},
        {"id": "svc-2", "name": "beta", "endpoints": []}
    ]"#;

    async fn mock_upstream(server: &mut mockito::ServerGuard, service_id: &str) {
        server
            .mock("GET", "/provisioning/v1/services")
            .with_status(200)
            .with_body(SERVICES)
            .create_async()
            .await;
        server
            .mock(
                "GET",
                format!("/provisioning/v1/services/{}/security/credentials", service_id).as_str(),
            )
            .with_status(200)
            .with_body(r#"{"username": "u", "password": "p"}"#)
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn test_connects_with_resolved_credentials() {
        let mut server = mockito::Server::new_async().await;
        mock_upstream(&mut server, "svc-1").await;
        let table = ResultTable {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![vec!["1".to_string(), "a".to_string()]],
        };
        let connector = RecordingConnector::returning(Ok(SqlOutcome::Rows(table.clone())));
        let ctx = context_with(&server.url(), "SKYSQL_TEST_KEY_SQL_OK", connector.clone());

        let outcome = execute_sql(&ctx, "svc-1", "SELECT id, name FROM t").await.unwrap();

        assert_eq!(outcome, SqlOutcome::Rows(table));
        assert_eq!(
            connector.targets(),
            vec![ConnectTarget {
                host: "h".to_string(),
                port: 4000,
                username: "u".to_string(),
                password: "p".to_string(),
            }]
        );
        assert_eq!(connector.executed(), vec!["SELECT id, name FROM t".to_string()]);
        assert_eq!(connector.closes(), 1);
    }

    #[tokio::test]
    async fn test_query_error_releases_connection() {
        let mut server = mockito::Server::new_async().await;
        mock_upstream(&mut server, "svc-1").await;
        let connector = RecordingConnector::returning(Err(DbError::new(
            Some(1146),
            "Table 'db.t' doesn't exist",
        )));
        let ctx = context_with(&server.url(), "SKYSQL_TEST_KEY_SQL_QUERY_ERR", connector.clone());

        let err = execute_sql(&ctx, "svc-1", "SELECT * FROM t").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Query execution failed (error 1146): Table 'db.t' doesn't exist"
        );
        assert_eq!(connector.closes(), 1);
    }

    #[tokio::test]
    async fn test_connection_error() {
        let mut server = mockito::Server::new_async().await;
        mock_upstream(&mut server, "svc-1").await;
        let connector = RecordingConnector::refusing(DbError::new(Some(1045), "Access denied"));
        let ctx = context_with(&server.url(), "SKYSQL_TEST_KEY_SQL_CONNECT_ERR", connector.clone());

        let err = execute_sql(&ctx, "svc-1", "SELECT 1").await.unwrap_err();

        assert_eq!(
            err,
            ToolError::Connection {
                code: Some(1045),
                message: "Access denied".to_string()
            }
        );
        assert!(connector.executed().is_empty());
    }

    #[tokio::test]
    async fn test_missing_details_skip_connection() {
        let mut server = mockito::Server::new_async().await;
        mock_upstream(&mut server, "svc-2").await;
        let connector = RecordingConnector::returning(Ok(SqlOutcome::Affected(0)));
        let ctx = context_with(&server.url(), "SKYSQL_TEST_KEY_SQL_MISSING", connector.clone());

        let err = execute_sql(&ctx, "svc-2", "SELECT 1").await.unwrap_err();

        assert_eq!(
            err,
            ToolError::MissingData {
                service_id: "svc-2".to_string(),
                missing: vec!["host", "port"],
            }
        );
        assert!(connector.targets().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_service_reuses_credentials_message() {
        let mut server = mockito::Server::new_async().await;
        mock_upstream(&mut server, "svc-1").await;
        let connector = RecordingConnector::returning(Ok(SqlOutcome::Affected(0)));
        let ctx = context_with(&server.url(), "SKYSQL_TEST_KEY_SQL_UNKNOWN", connector.clone());

        let err = execute_sql(&ctx, "svc-9", "SELECT 1").await.unwrap_err();

        assert_eq!(err.to_string(), "Service with ID svc-9 not found");
        assert!(connector.targets().is_empty());
    }
}
