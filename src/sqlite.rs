//! Generic SQLite surface: value and parameter types, schema description,
//! and the [`SqliteStore`] wrapper around a [`rusqlite::Connection`].
//!
//! Every statement goes through the same lifecycle: prepare, bind named
//! parameters, step, and finalize (rusqlite finalizes on drop).

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};
use rusqlite::types::{ToSqlOutput, Value as RawValue, ValueRef};
use rusqlite::{Connection, Statement, ToSql};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(RawValue::Null),
            Self::Integer(v) => ToSqlOutput::Owned(RawValue::Integer(*v)),
            Self::Real(v) => ToSqlOutput::Owned(RawValue::Real(*v)),
            Self::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Self::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
            // SQLite has no boolean affinity; stored as 0/1
            Self::Boolean(v) => ToSqlOutput::Owned(RawValue::Integer(i64::from(*v))),
        })
    }
}

impl From<RawValue> for Value {
    fn from(v: RawValue) -> Self {
        match v {
            RawValue::Null => Self::Null,
            RawValue::Integer(i) => Self::Integer(i),
            RawValue::Real(r) => Self::Real(r),
            RawValue::Text(t) => Self::Text(t),
            RawValue::Blob(b) => Self::Blob(b),
        }
    }
}

/// Parameter bindings for SQL queries
///
/// Parameters are named; `with_value("id", 1)` binds to the `:id`
/// placeholder in the statement text.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    pub values: HashMap<String, Value>,
}

impl Params {
    /// Create a new Params object
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }
}

/// SQL Query with typed parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    pub params: Params,
}

impl SqlQuery {
    pub fn new(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// A result row, keyed by column name.
pub type Row = HashMap<String, Value>;

/// Schema definition for the SQLite database
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    /// Table-level primary key; empty when a column carries
    /// [`ColumnConstraint::PrimaryKey`] itself.
    pub primary_key: Vec<String>,
    pub indexes: Vec<IndexDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
    pub default_value: Option<DefaultValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Text,
    Real,
    Blob,
}

impl DataType {
    fn sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColumnConstraint {
    PrimaryKey,
    NotNull,
    Unique,
}

impl ColumnConstraint {
    fn sql(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::NotNull => "NOT NULL",
            Self::Unique => "UNIQUE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    Integer(i64),
    Text(String),
    Real(f64),
    Null,
    CurrentTimestamp,
}

impl DefaultValue {
    fn sql(&self) -> String {
        match self {
            Self::Integer(v) => v.to_string(),
            Self::Text(v) => format!("'{}'", v.replace('\'', "''")),
            Self::Real(v) => v.to_string(),
            Self::Null => "NULL".to_string(),
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl TableDefinition {
    /// Renders the `CREATE TABLE` statement for this table.
    fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|col| {
                let mut sql = format!("{} {}", col.name, col.data_type.sql());
                for constraint in &col.constraints {
                    sql.push(' ');
                    sql.push_str(constraint.sql());
                }
                if let Some(default) = &col.default_value {
                    sql.push_str(" DEFAULT ");
                    sql.push_str(&default.sql());
                }
                sql
            })
            .collect();
        if !self.primary_key.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            parts.join(", ")
        )
    }

    fn index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|idx| {
                format!(
                    "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
                    if idx.unique { "UNIQUE " } else { "" },
                    idx.name,
                    self.name,
                    idx.columns.join(", ")
                )
            })
            .collect()
    }
}

/// SQLite store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: String,
    /// Schema definition for the database
    pub schema: Schema,
}

impl SqliteConfig {
    /// Create a new SQLite config with path and schema
    pub fn new(db_path: impl Into<String>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            schema,
        }
    }
}

/// A SQLite database handle with the schema applied.
///
/// The connection is held until [`close`](Self::close) is called (or the
/// store is dropped); any use after close fails with
/// [`StoreError::Closed`].
pub struct SqliteStore {
    connection: Option<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `config.db_path` and apply the schema.
    pub fn open(config: &SqliteConfig) -> StoreResult<Self> {
        info!("opening sqlite store at path: {}", config.db_path);
        let connection = Connection::open(Path::new(&config.db_path))?;
        let store = Self {
            connection: Some(connection),
        };
        store.initialize_schema(&config.schema)?;
        Ok(store)
    }

    /// Open an in-memory database with the given schema.
    pub fn open_in_memory(schema: &Schema) -> StoreResult<Self> {
        let store = Self {
            connection: Some(Connection::open_in_memory()?),
        };
        store.initialize_schema(schema)?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<&Connection> {
        self.connection.as_ref().ok_or(StoreError::Closed)
    }

    fn initialize_schema(&self, schema: &Schema) -> StoreResult<()> {
        let conn = self.conn()?;
        for table in &schema.tables {
            let sql = table.create_sql();
            debug!("applying schema: {sql}");
            conn.execute_batch(&sql)?;
            for index_sql in table.index_sql() {
                debug!("applying schema: {index_sql}");
                conn.execute_batch(&index_sql)?;
            }
        }
        Ok(())
    }

    /// Execute a statement that returns no rows. Returns the number of rows
    /// changed.
    pub fn execute(&self, query: &SqlQuery) -> StoreResult<usize> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&query.statement)?;
        bind_params(&mut stmt, &query.params)?;
        let changed = stmt.raw_execute()?;
        Ok(changed)
    }

    /// Execute the same statement once per parameter set, preparing it a
    /// single time and rebinding between steps. Returns the total number of
    /// rows changed.
    pub fn execute_many(&self, statement: &str, param_sets: &[Params]) -> StoreResult<usize> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(statement)?;
        let mut changed = 0;
        for params in param_sets {
            bind_params(&mut stmt, params)?;
            changed += stmt.raw_execute()?;
        }
        Ok(changed)
    }

    /// Run a query, stepping through every result row.
    pub fn query(&self, query: &SqlQuery) -> StoreResult<Vec<Row>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&query.statement)?;
        bind_params(&mut stmt, &query.params)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let mut rows = stmt.raw_query();
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = Row::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                let value: RawValue = row.get(i)?;
                map.insert(name.clone(), value.into());
            }
            result.push(map);
        }
        Ok(result)
    }

    /// Run a query expected to return at most one row.
    pub fn query_one(&self, query: &SqlQuery) -> StoreResult<Option<Row>> {
        Ok(self.query(query)?.into_iter().next())
    }

    /// Rowid of the most recent successful INSERT.
    pub fn last_insert_rowid(&self) -> StoreResult<i64> {
        Ok(self.conn()?.last_insert_rowid())
    }

    /// Rows changed by the most recent statement.
    pub fn changes(&self) -> StoreResult<u64> {
        Ok(self.conn()?.changes())
    }

    /// Close the connection. Further operations fail with
    /// [`StoreError::Closed`].
    pub fn close(&mut self) -> StoreResult<()> {
        match self.connection.take() {
            Some(conn) => conn.close().map_err(|(_, e)| StoreError::Sqlite(e)),
            None => Err(StoreError::Closed),
        }
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("open", &self.connection.is_some())
            .finish()
    }
}

/// Bind every named parameter to its `:name` placeholder (1-indexed in the
/// engine; resolved by name here).
fn bind_params(stmt: &mut Statement<'_>, params: &Params) -> StoreResult<()> {
    for (name, value) in &params.values {
        let index = stmt
            .parameter_index(&format!(":{name}"))?
            .ok_or_else(|| StoreError::UnknownParameter(name.clone()))?;
        stmt.raw_bind_parameter(index, value)?;
    }
    Ok(())
}
