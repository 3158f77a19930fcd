//! Query executor backed by a private, request-scoped Postgres connection.
//!
//! Each [`DbHandle`] owns one connection through a spawned connection task.
//! `query` hands a command to that task and returns immediately with a
//! [`Dispatched`] handle; the task executes commands strictly in receipt
//! order, which is what gives one handler's sequential queries their in-order
//! suspension/resumption guarantee.
//!
//! Dropping the handle closes the command channel. The connection task drains
//! commands that were already dispatched (an aborted request does not stop a
//! query that is on its way to the database), then closes the connection. Drop
//! is the release, so the connection is returned on every handler exit path.

use std::time::Duration;

use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Column, Connection, Row as SqlxRow, TypeInfo};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::drift::Dispatched;
use crate::error::AppError;

/// Scalar query parameter, bound positionally (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i32),
    Text(String),
}

/// Scalar column value as decoded from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

/// One result row: an ordered column-name -> value mapping. Column names keep
/// the casing the database declared for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn from_columns(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn get_i32(&self, name: &str) -> Result<i32, AppError> {
        match self.get(name) {
            Some(Value::Int(v)) => i32::try_from(*v)
                .map_err(|_| AppError::db(format!("column '{name}' is out of i32 range"))),
            Some(other) => Err(AppError::db(format!(
                "column '{name}' is not an integer: {other:?}"
            ))),
            None => Err(AppError::db(format!("column '{name}' missing from row"))),
        }
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, AppError> {
        match self.get(name) {
            Some(Value::Int(v)) => Ok(*v),
            Some(other) => Err(AppError::db(format!(
                "column '{name}' is not an integer: {other:?}"
            ))),
            None => Err(AppError::db(format!("column '{name}' missing from row"))),
        }
    }

    pub fn get_text(&self, name: &str) -> Result<&str, AppError> {
        match self.get(name) {
            Some(Value::Text(v)) => Ok(v),
            Some(other) => Err(AppError::db(format!(
                "column '{name}' is not text: {other:?}"
            ))),
            None => Err(AppError::db(format!("column '{name}' missing from row"))),
        }
    }
}

struct Command {
    sql: String,
    params: Vec<Param>,
    reply: oneshot::Sender<Result<Vec<Row>, AppError>>,
}

/// Handle to a single open database connection, private to one handler
/// invocation.
pub struct DbHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl DbHandle {
    /// Opens a connection and spawns its owning task. Connect failures are
    /// fatal to the request; there is no retry.
    pub async fn connect(url: &str, query_timeout: Option<Duration>) -> Result<Self, AppError> {
        let conn = PgConnection::connect(url).await?;
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_connection(conn, rx, query_timeout));
        Ok(Self { tx })
    }

    /// Dispatches a parameterized query. The call itself never suspends; the
    /// returned handle is the suspension point.
    pub fn query(&self, sql: &str, params: Vec<Param>) -> Dispatched<Vec<Row>> {
        let (reply, dispatched) = Dispatched::channel();
        let command = Command {
            sql: sql.to_string(),
            params,
            reply,
        };
        // A failed send means the connection task is gone. The command (and
        // with it the reply sender) is dropped, so the waiter observes the
        // failure when it resolves.
        let _ = self.tx.send(command);
        dispatched
    }
}

async fn run_connection(
    mut conn: PgConnection,
    mut rx: mpsc::UnboundedReceiver<Command>,
    query_timeout: Option<Duration>,
) {
    while let Some(command) = rx.recv().await {
        let result = execute(&mut conn, &command.sql, command.params, query_timeout).await;
        if command.reply.send(result).is_err() {
            // Requester aborted while suspended. The query already ran to
            // completion; only the resumption is skipped.
            debug!(sql = %command.sql, "query completed after its requester went away");
        }
    }
    if let Err(error) = conn.close().await {
        warn!(%error, "failed to close database connection");
    }
}

async fn execute(
    conn: &mut PgConnection,
    sql: &str,
    params: Vec<Param>,
    query_timeout: Option<Duration>,
) -> Result<Vec<Row>, AppError> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = match param {
            Param::Int(v) => query.bind(v),
            Param::Text(v) => query.bind(v),
        };
    }

    let rows = match query_timeout {
        Some(limit) => tokio::time::timeout(limit, query.fetch_all(&mut *conn))
            .await
            .map_err(|_| {
                AppError::db(format!("query exceeded {}ms deadline", limit.as_millis()))
            })??,
        None => query.fetch_all(&mut *conn).await?,
    };

    rows.iter().map(decode_row).collect()
}

fn decode_row(row: &PgRow) -> Result<Row, AppError> {
    let mut columns = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "INT2" => row
                .try_get::<Option<i16>, _>(index)?
                .map(|v| Value::Int(i64::from(v))),
            "INT4" => row
                .try_get::<Option<i32>, _>(index)?
                .map(|v| Value::Int(i64::from(v))),
            "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::Int),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
                row.try_get::<Option<String>, _>(index)?.map(Value::Text)
            }
            other => {
                return Err(AppError::db(format!(
                    "unsupported column type '{other}' for column '{}'",
                    column.name()
                )))
            }
        };
        columns.push((column.name().to_string(), value.unwrap_or(Value::Null)));
    }
    Ok(Row { columns })
}
