//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the types for creating and editing transactions
//! - The `TransactionStore` trait and its SQLite implementation
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;
mod list_endpoint;
mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use core::{
    NewTransaction, Transaction, TransactionChanges, TransactionId, create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use store::{SQLiteTransactionStore, TransactionStore};
