//! Fetching a single transaction, including the ownership check shared by the
//! edit and delete endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error, UserID,
    transaction::{SQLiteTransactionStore, Transaction, TransactionId, TransactionStore},
};

/// A route handler that responds with the caller's transaction `transaction_id` as JSON.
///
/// # Errors
/// Responds with 404 if the transaction does not exist and 403 if it belongs
/// to another user.
pub async fn get_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;

    get_owned_transaction(&store, user_id, transaction_id).map(Json)
}

/// Parse the transaction ID from a URL path segment.
///
/// A segment that is not an integer cannot name a transaction, so it is
/// reported as [Error::NotFound].
pub(super) fn parse_transaction_id(raw_id: &str) -> Result<TransactionId, Error> {
    raw_id.parse().map_err(|_| Error::NotFound)
}

/// Get the transaction `id` if it is owned by `user_id`.
///
/// Existence is checked before ownership.
///
/// # Errors
/// Returns a:
/// - [Error::NotFound] if there is no transaction with `id`,
/// - [Error::Forbidden] if the transaction is owned by another user,
/// - or any error from `store`.
pub(super) fn get_owned_transaction<S>(
    store: &S,
    user_id: UserID,
    id: TransactionId,
) -> Result<Transaction, Error>
where
    S: TransactionStore,
{
    let transaction = store.get(id)?;

    if transaction.user_id != user_id {
        tracing::warn!(
            "User {user_id} tried to access transaction {id} owned by user {}",
            transaction.user_id
        );
        return Err(Error::Forbidden);
    }

    Ok(transaction)
}
