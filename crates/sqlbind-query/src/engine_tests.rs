//! Tests for bound query execution

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use sqlbind_core::{
    BindConfig, ColumnMeta, Connection, QueryResult, Result, Row, SqlBindError, StatementResult,
    Value,
};

use crate::engine::{BindCommand, BoundExecution, QueryEngine};
use crate::error::QueryServiceError;
use crate::parameters::{BindError, NamedSet};

fn initialize_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("sqlbind_query=debug".parse().unwrap()),
            )
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Mock connection that records every statement it receives
struct MockConnection {
    rows: usize,
    exec_returns_rows: bool,
    fail: bool,
    statements: Mutex<Vec<String>>,
}

impl MockConnection {
    fn returning_rows(rows: usize) -> Self {
        Self {
            rows,
            exec_returns_rows: false,
            fail: false,
            statements: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning_rows(0)
        }
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    fn record(&self, sql: &str) -> Result<()> {
        self.statements.lock().unwrap().push(sql.to_string());
        if self.fail {
            return Err(SqlBindError::Query("relation \"t\" does not exist".into()));
        }
        Ok(())
    }

    fn result(&self) -> QueryResult {
        let mut result = QueryResult::empty();
        result.columns = vec![ColumnMeta {
            name: "id".into(),
            data_type: "int4".into(),
            ..Default::default()
        }];
        result.rows = (0..self.rows)
            .map(|i| Row::new(vec!["id".into()], vec![Value::Int64(i as i64)]))
            .collect();
        result
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, sql: &str, _params: &[Value]) -> Result<StatementResult> {
        self.record(sql)?;
        Ok(StatementResult {
            is_query: self.exec_returns_rows,
            result: self.exec_returns_rows.then(|| self.result()),
            affected_rows: if self.exec_returns_rows { 0 } else { 3 },
        })
    }

    async fn query(&self, sql: &str, _params: &[Value]) -> Result<QueryResult> {
        self.record(sql)?;
        Ok(self.result())
    }
}

fn set(pairs: &[(&str, &str)]) -> NamedSet {
    pairs.iter().copied().collect()
}

mod bind_command_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bind_command_names_round_trip() {
        for command in [
            BindCommand::Dml,
            BindCommand::OneRow,
            BindCommand::ZeroOrOneRow,
            BindCommand::Select,
            BindCommand::Exec,
        ] {
            assert_eq!(command.as_str().parse::<BindCommand>().unwrap(), command);
            assert_eq!(command.to_string(), command.as_str());
        }
    }

    #[test]
    fn test_unknown_bind_command() {
        let err = "2row".parse::<BindCommand>().unwrap_err();
        assert!(matches!(err, QueryServiceError::UnknownCommand(ref name) if name == "2row"));
    }
}

mod execute_bound_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_dml_runs_rewritten_sql() {
        initialize_logging();
        let mock = Arc::new(MockConnection::returning_rows(0));
        let conn: Arc<dyn Connection> = mock.clone();

        let outcome = QueryEngine::new()
            .execute_bound(
                &conn,
                BindCommand::Dml,
                "update t set name = :name where id = :id",
                &set(&[("name", "O'Brien"), ("id", "7")]),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, BoundExecution::Dml { affected_rows: 3 }));
        assert_eq!(
            mock.statements(),
            vec!["update t set name = 'O''Brien' where id = '7'".to_string()]
        );
    }

    #[tokio::test]
    async fn test_bind_error_never_reaches_connection() {
        initialize_logging();
        let mock = Arc::new(MockConnection::returning_rows(1));
        let conn: Arc<dyn Connection> = mock.clone();

        let err = QueryEngine::new()
            .execute_bound(&conn, BindCommand::Select, "select * from t where id = :id", &set(&[]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            QueryServiceError::Bind(BindError::UnresolvedBindVariable(ref name)) if name == "id"
        ));
        assert!(mock.statements().is_empty());
    }

    #[tokio::test]
    async fn test_strict_config_rejects_before_execution() {
        let mock = Arc::new(MockConnection::returning_rows(1));
        let conn: Arc<dyn Connection> = mock.clone();

        let err = QueryEngine::with_config(BindConfig::standard())
            .execute_bound(&conn, BindCommand::Select, "select 'open", &set(&[]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            QueryServiceError::Bind(BindError::MalformedQuotedLiteral { position: 7 })
        ));
        assert!(mock.statements().is_empty());
    }

    #[tokio::test]
    async fn test_one_row_requires_exactly_one_row() {
        for (rows, ok) in [(0, false), (1, true), (2, false)] {
            let conn: Arc<dyn Connection> = Arc::new(MockConnection::returning_rows(rows));
            let result = QueryEngine::new()
                .execute_bound(&conn, BindCommand::OneRow, "select id from t where id = :id", &set(&[("id", "0")]))
                .await;

            match result {
                Ok(BoundExecution::Row(row)) => {
                    assert!(ok);
                    assert_eq!(row.get_by_name("id"), Some(&Value::Int64(0)));
                }
                Err(QueryServiceError::RowCount { command, actual, .. }) => {
                    assert!(!ok);
                    assert_eq!(command, BindCommand::OneRow);
                    assert_eq!(actual, rows);
                }
                other => panic!("unexpected result for {rows} rows: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_zero_or_one_row() {
        let conn: Arc<dyn Connection> = Arc::new(MockConnection::returning_rows(0));
        let outcome = QueryEngine::new()
            .execute_bound(&conn, BindCommand::ZeroOrOneRow, "select 1", &set(&[]))
            .await
            .unwrap();
        assert!(matches!(outcome, BoundExecution::OptionalRow(None)));

        let conn: Arc<dyn Connection> = Arc::new(MockConnection::returning_rows(1));
        let outcome = QueryEngine::new()
            .execute_bound(&conn, BindCommand::ZeroOrOneRow, "select 1", &set(&[]))
            .await
            .unwrap();
        assert!(matches!(outcome, BoundExecution::OptionalRow(Some(_))));

        let conn: Arc<dyn Connection> = Arc::new(MockConnection::returning_rows(2));
        let err = QueryEngine::new()
            .execute_bound(&conn, BindCommand::ZeroOrOneRow, "select 1", &set(&[]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "0or1row expected 0 or 1 row(s), got 2");
    }

    #[tokio::test]
    async fn test_select_returns_all_rows() {
        let conn: Arc<dyn Connection> = Arc::new(MockConnection::returning_rows(5));
        let outcome = QueryEngine::new()
            .execute_bound(&conn, BindCommand::Select, "select id from t where tag = :tag", &set(&[("tag", "")]))
            .await
            .unwrap();

        match outcome {
            BoundExecution::Rows(result) => {
                assert_eq!(result.row_count(), 5);
                assert_eq!(result.column_count(), 1);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exec_reports_dml_or_rows() {
        let conn: Arc<dyn Connection> = Arc::new(MockConnection::returning_rows(0));
        let outcome = QueryEngine::new()
            .execute_bound(&conn, BindCommand::Exec, "delete from t", &set(&[]))
            .await
            .unwrap();
        assert!(!outcome.returned_rows());

        let conn: Arc<dyn Connection> = Arc::new(MockConnection {
            exec_returns_rows: true,
            ..MockConnection::returning_rows(2)
        });
        let outcome = QueryEngine::new()
            .execute_bound(&conn, BindCommand::Exec, "select id from t", &set(&[]))
            .await
            .unwrap();
        assert!(outcome.returned_rows());
        assert!(matches!(outcome, BoundExecution::Rows(ref r) if r.row_count() == 2));
    }

    #[tokio::test]
    async fn test_connection_errors_are_propagated() {
        initialize_logging();
        let conn: Arc<dyn Connection> = Arc::new(MockConnection::failing());
        let err = QueryEngine::new()
            .execute_bound(&conn, BindCommand::Dml, "delete from t where id = :id", &set(&[("id", "1")]))
            .await
            .unwrap_err();

        assert!(matches!(err, QueryServiceError::Core(SqlBindError::Query(_))));
    }

    #[test]
    fn test_bind_without_execution() {
        let engine = QueryEngine::with_config(BindConfig::legacy().with_empty_as_null(false));
        let sql = engine.bind("select :a", &set(&[("a", "")])).unwrap();

        assert_eq!(sql, "select ''");
        assert!(!engine.rewriter().config().empty_as_null);
    }
}
