//! # pairank-online
//!
//! Online incremental score updates for pairwise-comparison rankings.
//!
//! A changed comparison moves only its two entities: the local estimator
//! takes one frozen-neighbour Newton step for them, the new raw scores are
//! persisted and rescaled, every aggregation mode republishes the two
//! entities' global scores, and the per-entity totals are recomputed once
//! every criterion is done. Criteria run independently, optionally on a
//! worker pool. The batch aggregator remains the source of truth; the
//! online path keeps the published rankings fresh in between.

pub mod aggregator;
pub mod engine;
pub mod estimator;
pub mod fanout;
pub mod global;
pub mod individual;
pub mod poll_scaling;
pub mod solve;
pub mod validator;

pub use aggregator::MeanAggregator;
pub use engine::{CriterionOutcome, CriterionUpdate, OnlineHeuristics};
pub use estimator::{EntityEstimate, LocalEstimator, PairEstimate};
pub use fanout::{update_user_scores, CriterionReport, FanOutMode, RunReport, RunStatus};
pub use poll_scaling::{IdentityPollScaling, LinearPollScaling};
pub use solve::{solve_individual_scores, SolveOptions, SolveReport};
pub use validator::{validate_update, SkipReason};
