//! Defines the core data models and the database table for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::UserID;

// ============================================================================
// MODELS
// ============================================================================

/// A newtype wrapper for integer transaction IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Create a new transaction ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the transaction ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

mod date_format {
    //! Serializes a [time::Date] as an ISO 8601 calendar date, e.g. "2025-10-05".
    use serde::Serializer;
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    /// The format used for dates in both requests and responses.
    pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

pub(crate) use date_format::DATE_FORMAT;

/// A single financial ledger entry, i.e. money that was spent or earned.
///
/// A transaction always belongs to exactly one user, see [Transaction::user_id].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that created, and owns, the transaction.
    pub user_id: UserID,
    /// The category the transaction is filed under.
    pub category_id: String,
    /// The budget the transaction counts towards.
    pub budget_id: String,
    /// The savings goal the transaction contributes to.
    pub goal_id: String,
    /// What kind of transaction this is, e.g. "expense" or "income".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(serialize_with = "date_format::serialize")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
}

/// The client supplied fields of a transaction that has not been stored yet.
///
/// The owner is deliberately absent: it is always the authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// See [Transaction::category_id].
    pub category_id: String,
    /// See [Transaction::budget_id].
    pub budget_id: String,
    /// See [Transaction::goal_id].
    pub goal_id: String,
    /// See [Transaction::transaction_type].
    pub transaction_type: String,
    /// See [Transaction::amount].
    pub amount: f64,
    /// See [Transaction::date].
    pub date: Date,
    /// See [Transaction::description].
    pub description: String,
}

/// A partial update to a transaction. Fields set to `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// Replaces [Transaction::category_id].
    pub category_id: Option<String>,
    /// Replaces [Transaction::budget_id].
    pub budget_id: Option<String>,
    /// Replaces [Transaction::goal_id].
    pub goal_id: Option<String>,
    /// Replaces [Transaction::transaction_type].
    pub transaction_type: Option<String>,
    /// Replaces [Transaction::amount].
    pub amount: Option<f64>,
    /// Replaces [Transaction::date].
    pub date: Option<Date>,
    /// Replaces [Transaction::description].
    pub description: Option<String>,
}

impl TransactionChanges {
    /// Whether applying these changes would leave a transaction as it is.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the fields of `transaction` that are set in `self`.
    pub fn apply(self, transaction: &mut Transaction) {
        if let Some(category_id) = self.category_id {
            transaction.category_id = category_id;
        }
        if let Some(budget_id) = self.budget_id {
            transaction.budget_id = budget_id;
        }
        if let Some(goal_id) = self.goal_id {
            transaction.goal_id = goal_id;
        }
        if let Some(transaction_type) = self.transaction_type {
            transaction.transaction_type = transaction_type;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(description) = self.description {
            transaction.description = description;
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns of the transaction table in the order [map_transaction_row] expects.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, user_id, category_id, budget_id, goal_id, transaction_type, amount, date, description";

/// Create the transaction table in the database.
///
/// The user table must exist before calling this function.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category_id TEXT NOT NULL,
                budget_id TEXT NOT NULL,
                goal_id TEXT NOT NULL,
                transaction_type TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user ON \"transaction\"(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let category_id = row.get(2)?;
    let budget_id = row.get(3)?;
    let goal_id = row.get(4)?;
    let transaction_type = row.get(5)?;
    let amount = row.get(6)?;
    let date = row.get(7)?;
    let description = row.get(8)?;

    Ok(Transaction {
        id: TransactionId::new(id),
        user_id: UserID::new(user_id),
        category_id,
        budget_id,
        goal_id,
        transaction_type,
        amount,
        date,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================
