//! Single-writer actor for SQLite.
//!
//! SQLite allows many concurrent readers under WAL but only one writer.
//! Instead of letting pool connections race for the write lock, every
//! mutation is shipped as a job to one background task that owns a single
//! connection and applies jobs serially, each inside an immediate
//! transaction. Reads keep going through the pool.

use std::any::Any;

use diesel::SqliteConnection;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use dashfolio_core::errors::Result;

/// A database job: runs against the writer's connection, returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

/// Type-erased job plus the oneshot used to send its result back.
type Envelope = (
    Job<Box<dyn Any + Send + 'static>>,
    oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>,
);

/// Cloneable handle for submitting jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Executes a database job on the writer's dedicated connection.
    ///
    /// The job runs inside an immediate transaction; returning `Err` rolls
    /// it back. The result is sent back over a oneshot channel and
    /// downcast to `T`.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        // Erase the job's return type so one channel carries every job.
        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .expect("Writer actor's receiving channel was closed, indicating the actor stopped.");

        ret_rx
            .await
            .expect("Writer actor dropped the reply sender without sending a result.")
            .map(|boxed: Box<dyn Any + Send + 'static>| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("Failed to downcast writer actor result."))
            })
    }
}

/// Spawns the background task that acts as the single writer.
///
/// The actor takes one connection from the pool and holds it for its whole
/// lifetime. It terminates when the last `WriteHandle` is dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("Failed to get a connection from the pool for the writer actor.");

        while let Some((job, reply_tx)) = rx.recv().await {
            // The job itself returns a core Result; StorageError bridges it
            // through immediate_transaction, which needs From<DieselError>.
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(|e: StorageError| e.into());

            // Ignore send failure: the caller was cancelled and dropped
            // its receiver.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
