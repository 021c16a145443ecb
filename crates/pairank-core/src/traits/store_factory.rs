//! Store handles and the factory that opens them per worker.

use super::{ScoreSink, ScoreSource};
use crate::errors::StorageError;

/// A poll-scoped handle implementing both storage ports.
pub trait ScoreStore: ScoreSource + ScoreSink {}

impl<T: ScoreSource + ScoreSink> ScoreStore for T {}

/// Opens a fresh store with its own connection.
///
/// The factory is shared across workers; the stores it returns never are.
pub trait StoreFactory: Send + Sync {
    type Store: ScoreStore;

    fn open(&self, poll: &str) -> Result<Self::Store, StorageError>;
}
