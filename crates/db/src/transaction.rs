//! Transaction coordinator.
//!
//! Runs a caller-supplied unit of work on one database transaction. The unit
//! receives the transaction handle and issues its writes through repositories
//! built on that handle, in order. Returning `Ok` commits; returning `Err`
//! rolls everything back.
//!
//! # Usage
//!
//! ```ignore
//! let user = in_transaction(&db, |txn| {
//!     Box::pin(async move {
//!         let users = UserRepository::new(txn);
//!         users.create(input).await
//!     })
//! })
//! .await?;
//! ```

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, TransactionError, TransactionTrait};
use tracing::{debug, warn};

use crate::error::{DataError, DataResult};

/// Future returned by a transactional unit.
pub type UnitFuture<'c, T> = Pin<Box<dyn Future<Output = DataResult<T>> + Send + 'c>>;

/// Executes `unit` atomically.
///
/// No retry is attempted; a failed unit is reported as
/// [`DataError::TransactionAborted`] carrying the unit's own error. Failing to
/// begin or commit is classified like any other storage error.
///
/// # Errors
///
/// Returns an error if the unit fails or the transaction cannot be begun or
/// committed.
pub async fn in_transaction<C, F, T>(db: &C, unit: F) -> DataResult<T>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> UnitFuture<'c, T> + Send,
    T: Send,
{
    match db.transaction::<F, T, DataError>(unit).await {
        Ok(value) => {
            debug!("Transaction committed");
            Ok(value)
        }
        Err(TransactionError::Transaction(err)) => {
            warn!(code = err.error_code(), error = %err, "Transaction rolled back");
            Err(DataError::TransactionAborted(Box::new(err)))
        }
        Err(TransactionError::Connection(err)) => Err(err.into()),
    }
}
