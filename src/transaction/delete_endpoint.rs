use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error, UserID,
    transaction::{
        SQLiteTransactionStore, TransactionId, TransactionStore,
        get_endpoint::{get_owned_transaction, parse_transaction_id},
    },
};

/// A route handler for deleting one of the caller's transactions, responds with an empty JSON object.
///
/// # Errors
/// Responds with 404 if the transaction does not exist and 403 if it belongs
/// to another user.
pub async fn delete_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Value>, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;

    delete_transaction(&store, user_id, transaction_id)?;

    Ok(Json(json!({})))
}

fn delete_transaction<S>(store: &S, user_id: UserID, id: TransactionId) -> Result<(), Error>
where
    S: TransactionStore,
{
    get_owned_transaction(store, user_id, id)?;
    store.delete(id)?;
    tracing::info!("User {user_id} deleted transaction {id}");

    Ok(())
}
