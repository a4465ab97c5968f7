//! Sets up the application database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, transaction::create_transaction_table, user::create_user_table};

/// Create the tables for all domain models if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection`, which is needed
/// for a user's transactions to be removed along with the user.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash, TransactionStore,
        transaction::{SQLiteTransactionStore, test_utils::new_transaction},
        user::{Email, create_user},
    };

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let enabled: bool = connection
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn deleting_user_deletes_their_transactions() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(
            Email::new_unchecked("foo@bar.baz"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let connection = Arc::new(Mutex::new(connection));
        let store = SQLiteTransactionStore::new(connection.clone());
        let transaction = store.create(user.id, new_transaction()).unwrap();

        connection
            .lock()
            .unwrap()
            .execute("DELETE FROM user WHERE id = ?1", (user.id.as_i64(),))
            .unwrap();

        assert_eq!(store.get(transaction.id), Err(Error::NotFound));
    }
}
