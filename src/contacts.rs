//! Typed contact storage on top of the generic [`SqliteStore`].
//!
//! A contact is one row in the `contacts` table: an integer primary key and
//! a name. Every operation runs through a prepared statement with bound
//! parameters.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::sqlite::{
    ColumnConstraint, ColumnDefinition, DataType, IndexDefinition, Params, Row, Schema, SqlQuery,
    SqliteConfig, SqliteStore, TableDefinition, Value,
};

/// A single contact row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
}

impl Contact {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    fn from_row(row: &Row) -> StoreResult<Self> {
        let id = match row.get("id") {
            Some(Value::Integer(id)) => *id,
            _ => {
                return Err(StoreError::ColumnType {
                    column: "id",
                    expected: "integer",
                })
            }
        };
        let name = match row.get("name") {
            Some(Value::Text(name)) => name.clone(),
            _ => {
                return Err(StoreError::ColumnType {
                    column: "name",
                    expected: "text",
                })
            }
        };
        Ok(Self { id, name })
    }
}

/// Schema for the contacts table.
pub fn contact_schema() -> Schema {
    Schema::new().add_table(TableDefinition {
        name: "contacts".to_string(),
        columns: vec![
            ColumnDefinition {
                name: "id".to_string(),
                data_type: DataType::Integer,
                constraints: vec![ColumnConstraint::PrimaryKey, ColumnConstraint::NotNull],
                default_value: None,
            },
            ColumnDefinition {
                name: "name".to_string(),
                data_type: DataType::Text,
                constraints: vec![ColumnConstraint::NotNull],
                default_value: None,
            },
        ],
        primary_key: vec![],
        indexes: vec![IndexDefinition {
            name: "idx_contacts_name".to_string(),
            columns: vec!["name".to_string()],
            unique: false,
        }],
    })
}

/// CRUD access to the contacts table.
pub struct ContactStore {
    store: SqliteStore,
}

impl ContactStore {
    /// Open (or create) the contact database at `db_path`.
    pub fn open(db_path: impl Into<String>) -> StoreResult<Self> {
        let config = SqliteConfig::new(db_path, contact_schema());
        Ok(Self {
            store: SqliteStore::open(&config)?,
        })
    }

    /// Open an in-memory contact database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            store: SqliteStore::open_in_memory(&contact_schema())?,
        })
    }

    /// The underlying store, for ad-hoc queries.
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Insert a single contact.
    pub fn insert(&self, contact: &Contact) -> StoreResult<()> {
        self.store.execute(
            &SqlQuery::new("INSERT INTO contacts (id, name) VALUES (:id, :name)").with_params(
                Params::new()
                    .with_value("id", contact.id)
                    .with_value("name", contact.name.as_str()),
            ),
        )?;
        info!("inserted contact {}", contact.id);
        Ok(())
    }

    /// Insert a batch of contacts through one prepared statement,
    /// rebinding per row.
    pub fn insert_many(&self, contacts: &[Contact]) -> StoreResult<usize> {
        let param_sets: Vec<Params> = contacts
            .iter()
            .map(|c| {
                Params::new()
                    .with_value("id", c.id)
                    .with_value("name", c.name.as_str())
            })
            .collect();
        let inserted = self.store.execute_many(
            "INSERT INTO contacts (id, name) VALUES (:id, :name)",
            &param_sets,
        )?;
        info!("inserted {inserted} contacts");
        Ok(inserted)
    }

    /// Fetch one contact by id.
    pub fn get(&self, id: i64) -> StoreResult<Option<Contact>> {
        let row = self.store.query_one(
            &SqlQuery::new("SELECT id, name FROM contacts WHERE id = :id")
                .with_params(Params::new().with_value("id", id)),
        )?;
        row.map(|r| Contact::from_row(&r)).transpose()
    }

    /// All contacts, ordered by id.
    pub fn all(&self) -> StoreResult<Vec<Contact>> {
        let rows = self
            .store
            .query(&SqlQuery::new("SELECT id, name FROM contacts ORDER BY id"))?;
        rows.iter().map(Contact::from_row).collect()
    }

    /// Number of contacts in the table.
    pub fn count(&self) -> StoreResult<u64> {
        let row = self
            .store
            .query_one(&SqlQuery::new("SELECT COUNT(*) AS n FROM contacts"))?;
        match row.as_ref().and_then(|r| r.get("n")) {
            Some(Value::Integer(n)) => Ok(u64::try_from(*n).unwrap_or(0)),
            _ => Err(StoreError::ColumnType {
                column: "n",
                expected: "integer",
            }),
        }
    }

    /// Change a contact's name. Returns `true` if a row was updated.
    pub fn rename(&self, id: i64, name: &str) -> StoreResult<bool> {
        let changed = self.store.execute(
            &SqlQuery::new("UPDATE contacts SET name = :name WHERE id = :id").with_params(
                Params::new().with_value("id", id).with_value("name", name),
            ),
        )?;
        Ok(changed > 0)
    }

    /// Delete a contact. Returns `true` if a row was deleted.
    pub fn remove(&self, id: i64) -> StoreResult<bool> {
        let changed = self.store.execute(
            &SqlQuery::new("DELETE FROM contacts WHERE id = :id")
                .with_params(Params::new().with_value("id", id)),
        )?;
        Ok(changed > 0)
    }

    /// Close the underlying connection.
    pub fn close(&mut self) -> StoreResult<()> {
        self.store.close()
    }
}
