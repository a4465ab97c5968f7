use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    http::{HeaderName, StatusCode, header::LOCATION},
};

use crate::{
    Error, UserID,
    endpoints::{self, format_endpoint},
    transaction::{SQLiteTransactionStore, Transaction, TransactionStore, form::TransactionForm},
};

/// A route handler for creating a new transaction owned by the caller.
///
/// Responds with the stored transaction, a 201 status code and the new
/// transaction's URI in the `Location` header.
///
/// # Errors
/// Responds with 400 if a field is missing or invalid, or if the database
/// rejects the transaction.
pub async fn create_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Extension(user_id): Extension<UserID>,
    body: Bytes,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Transaction>), Error> {
    let form = TransactionForm::from_bytes(&body)?;

    create_transaction(&store, user_id, form).map(|transaction| {
        tracing::info!("User {user_id} created transaction {}", transaction.id);
        let location = format_endpoint(endpoints::TRANSACTION, transaction.id.as_i64());

        (StatusCode::CREATED, [(LOCATION, location)], Json(transaction))
    })
}

/// Validate `form` and store it as a new transaction owned by `user_id`.
///
/// Any `user_id` sent by the client is ignored.
fn create_transaction<S>(
    store: &S,
    user_id: UserID,
    form: TransactionForm,
) -> Result<Transaction, Error>
where
    S: TransactionStore,
{
    let new_transaction = form.into_new_transaction()?;

    store.create(user_id, new_transaction)
}
