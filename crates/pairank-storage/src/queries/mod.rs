//! Per-table query modules. Every function takes a `&Connection` so it runs
//! equally on a plain connection or inside a transaction.

pub mod comparisons;
pub mod criteria;
pub mod entities;
pub mod entity_scores;
pub mod individual_scores;
pub mod ratings;
pub mod total_scores;
pub mod user_scalings;
