use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::macros::date;

use crate::{
    Error, PasswordHash, UserID,
    db::initialize,
    transaction::{
        NewTransaction, SQLiteTransactionStore, Transaction, TransactionId, TransactionStore,
    },
    user::{Email, create_user},
};

/// An in-memory store with two registered users, alice and bob.
pub fn get_store_with_users() -> (SQLiteTransactionStore, UserID, UserID) {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    let alice = create_user(
        Email::new_unchecked("alice@example.com"),
        PasswordHash::new_unchecked("hunter2"),
        &connection,
    )
    .unwrap();
    let bob = create_user(
        Email::new_unchecked("bob@example.com"),
        PasswordHash::new_unchecked("hunter3"),
        &connection,
    )
    .unwrap();

    (
        SQLiteTransactionStore::new(Arc::new(Mutex::new(connection))),
        alice.id,
        bob.id,
    )
}

pub fn new_transaction() -> NewTransaction {
    NewTransaction {
        category_id: "food".to_owned(),
        budget_id: "monthly".to_owned(),
        goal_id: "holiday".to_owned(),
        transaction_type: "expense".to_owned(),
        amount: 12.5,
        date: date!(2025 - 10 - 05),
        description: "Lunch".to_owned(),
    }
}

/// A store that holds a single transaction and fails every other operation
/// with the error made by `make_error`.
pub struct FailingStore {
    pub transaction: Transaction,
    pub make_error: fn() -> Error,
}

impl FailingStore {
    pub fn new(owner: UserID, make_error: fn() -> Error) -> Self {
        let new = new_transaction();
        Self {
            transaction: Transaction {
                id: TransactionId::new(1),
                user_id: owner,
                category_id: new.category_id,
                budget_id: new.budget_id,
                goal_id: new.goal_id,
                transaction_type: new.transaction_type,
                amount: new.amount,
                date: new.date,
                description: new.description,
            },
            make_error,
        }
    }
}

impl TransactionStore for FailingStore {
    fn create(&self, _: UserID, _: NewTransaction) -> Result<Transaction, Error> {
        Err((self.make_error)())
    }

    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        if id == self.transaction.id {
            Ok(self.transaction.clone())
        } else {
            Err(Error::NotFound)
        }
    }

    fn get_by_user(&self, _: UserID) -> Result<Vec<Transaction>, Error> {
        Err((self.make_error)())
    }

    fn update(&self, _: &Transaction) -> Result<Transaction, Error> {
        Err((self.make_error)())
    }

    fn delete(&self, _: TransactionId) -> Result<(), Error> {
        Err((self.make_error)())
    }
}
