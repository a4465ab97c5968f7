use axum::{Extension, Json, extract::State};

use crate::{
    Error, UserID,
    transaction::{SQLiteTransactionStore, Transaction, TransactionStore},
};

/// A route handler that responds with all of the caller's transactions as a JSON array.
pub async fn list_transactions_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Transaction>>, Error> {
    store.get_by_user(user_id).map(Json)
}
