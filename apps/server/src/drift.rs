//! Cooperative suspension bridge ("drift").
//!
//! Handlers issue database operations as direct, sequential-looking calls. The
//! call itself never waits: it returns a [`Dispatched`] handle to the in-flight
//! operation, and awaiting that handle is the suspension point. While a task is
//! parked here it consumes no worker thread; the scheduler runs other pending
//! requests until the operation's result arrives.
//!
//! Operations issued one after another by a single handler resolve in issuance
//! order, because each executor processes its command stream sequentially.
//! Nothing is guaranteed about ordering across handlers.
//!
//! Dropping a `Dispatched` (the owning request was aborted mid-suspension)
//! releases the waiting task and nothing else: the operation has already been
//! handed to its executor and runs to completion there. That asymmetry is part
//! of the contract, not an oversight.

use tokio::sync::oneshot;

use crate::error::AppError;

/// Handle to an in-flight asynchronous operation that will eventually produce
/// a `T` or fail.
pub struct Dispatched<T> {
    rx: oneshot::Receiver<Result<T, AppError>>,
}

impl<T> Dispatched<T> {
    /// Creates a completion slot and the handle that waits on it.
    ///
    /// The executor side keeps the sender and fulfills it exactly once when the
    /// operation finishes. If the sender is dropped unfulfilled, resolving the
    /// handle yields an error rather than hanging.
    pub fn channel() -> (oneshot::Sender<Result<T, AppError>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Suspends the calling task until the operation completes, then resumes
    /// it with the produced value or the failure.
    pub async fn resolve(self) -> Result<T, AppError> {
        self.rx.await.unwrap_or_else(|_| {
            Err(AppError::db(
                "dispatched operation was dropped before completing".to_string(),
            ))
        })
    }
}

/// Free-function form of [`Dispatched::resolve`], matching how handlers read:
/// `let rows = drift(conn.query(..)).await?;`
pub async fn drift<T>(op: Dispatched<T>) -> Result<T, AppError> {
    op.resolve().await
}

#[cfg(test)]
mod tests {
    use super::{drift, Dispatched};
    use crate::error::AppError;

    #[tokio::test]
    async fn resolves_with_the_produced_value() {
        let (tx, op) = Dispatched::channel();
        tx.send(Ok(42)).unwrap();
        assert_eq!(drift(op).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn propagates_the_operation_failure() {
        let (tx, op) = Dispatched::<u32>::channel();
        tx.send(Err(AppError::db("boom".to_string()))).unwrap();
        assert!(drift(op).await.is_err());
    }

    #[tokio::test]
    async fn vanished_executor_yields_an_error_not_a_hang() {
        let (tx, op) = Dispatched::<u32>::channel();
        drop(tx);
        let err = drift(op).await.unwrap_err();
        assert!(matches!(err, AppError::Db { .. }));
    }
}
