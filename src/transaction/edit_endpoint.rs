use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
};

use crate::{
    Error, UserID,
    transaction::{
        SQLiteTransactionStore, Transaction, TransactionId, TransactionStore,
        form::TransactionForm,
        get_endpoint::{get_owned_transaction, parse_transaction_id},
    },
};

/// A route handler for partially updating one of the caller's transactions.
///
/// Only the fields present in the form are changed.
///
/// # Errors
/// Responds with 404 if the transaction does not exist, 403 if it belongs to
/// another user, and 400 if a field is invalid or the database rejects the
/// change.
pub async fn edit_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<String>,
    body: Bytes,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;

    update_transaction(&store, user_id, transaction_id, &body).map(Json)
}

/// Apply the form-encoded `body` to the transaction `id` owned by `user_id`.
///
/// The ownership checks happen before `body` is parsed.
fn update_transaction<S>(
    store: &S,
    user_id: UserID,
    id: TransactionId,
    body: &[u8],
) -> Result<Transaction, Error>
where
    S: TransactionStore,
{
    let mut transaction = get_owned_transaction(store, user_id, id)?;
    let changes = TransactionForm::from_bytes(body)?.into_changes()?;

    if changes.is_empty() {
        return Ok(transaction);
    }

    changes.apply(&mut transaction);
    let transaction = store.update(&transaction)?;
    tracing::info!("User {user_id} updated transaction {id}");

    Ok(transaction)
}
