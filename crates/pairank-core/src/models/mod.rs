//! Score data model: comparisons, individual and global scores, trigger events.

pub mod aggregation_mode;
pub mod comparison;
pub mod event;
pub mod scores;

pub use aggregation_mode::AggregationMode;
pub use comparison::Comparison;
pub use event::ComparisonEvent;
pub use scores::{
    EntityAggregate, GlobalEntityScore, IndividualRawScore, RatingProperties,
    ScaledIndividualScore, UserScaling,
};
