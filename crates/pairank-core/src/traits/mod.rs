//! Ports between the online engine and its external collaborators.
//!
//! Storage, global aggregation, and poll-level rescaling are all supplied
//! by the host. `pairank-storage` and the reference collaborators in
//! `pairank-online` implement them.

pub mod aggregator;
pub mod poll_scaling;
pub mod score_sink;
pub mod score_source;
pub mod store_factory;

pub use aggregator::GlobalAggregator;
pub use poll_scaling::PollScaling;
pub use score_sink::{ReplaceScope, ScoreSink};
pub use score_source::{IndividualScoreFilter, ScoreSource};
pub use store_factory::{ScoreStore, StoreFactory};
