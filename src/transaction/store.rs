//! Defines the transaction store trait and its SQLite implementation.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    transaction::{
        NewTransaction, Transaction, TransactionId,
        core::{TRANSACTION_COLUMNS, map_transaction_row},
    },
};

/// Handles the persistence of transactions.
///
/// Implementations do not check ownership, callers are expected to compare
/// [Transaction::user_id] against the authenticated user.
pub trait TransactionStore {
    /// Store a new transaction owned by `user_id`.
    fn create(&self, user_id: UserID, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve all transactions owned by `user_id` in the order they were created.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Overwrite the stored fields of `transaction`, except for its owner.
    ///
    /// Returns [Error::NotFound] if the transaction no longer exists.
    fn update(&self, transaction: &Transaction) -> Result<Transaction, Error>;

    /// Remove a transaction from the store.
    ///
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;
}

/// Stores transactions in a SQLite database.
///
/// Because a transaction references its owner, the user table must be set up
/// in the database, see [initialize_db](crate::initialize_db).
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl FromRef<AppState> for SQLiteTransactionStore {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.db_connection.clone())
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert a new transaction into the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::ConstraintViolation] if `user_id` does not refer to a registered user,
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, user_id: UserID, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO \"transaction\"
                 (user_id, category_id, budget_id, goal_id, transaction_type, amount, date, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    user_id.as_i64(),
                    transaction.category_id,
                    transaction.budget_id,
                    transaction.goal_id,
                    transaction.transaction_type,
                    transaction.amount,
                    transaction.date,
                    transaction.description,
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
            ))?
            .query_row(&[(":id", &id.as_i64())], map_transaction_row)?;

        Ok(transaction)
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
                 WHERE user_id = :user_id ORDER BY id ASC"
            ))?
            .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn update(&self, transaction: &Transaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "UPDATE \"transaction\"
                 SET category_id = ?1, budget_id = ?2, goal_id = ?3, transaction_type = ?4,
                     amount = ?5, date = ?6, description = ?7
                 WHERE id = ?8
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    &transaction.category_id,
                    &transaction.budget_id,
                    &transaction.goal_id,
                    &transaction.transaction_type,
                    transaction.amount,
                    transaction.date,
                    &transaction.description,
                    transaction.id.as_i64(),
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id.as_i64())],
        )?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}
