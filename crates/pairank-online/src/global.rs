//! Global aggregation orchestration: one published view per aggregation mode.

use pairank_core::errors::StorageError;
use pairank_core::models::{AggregationMode, GlobalEntityScore, ScaledIndividualScore};
use pairank_core::traits::{
    GlobalAggregator, IndividualScoreFilter, PollScaling, ReplaceScope, ScoreSink, ScoreSource,
    ScoreStore,
};
use pairank_core::types::BTreeMap;

use crate::individual::scale_individual_scores;

/// Rows written per mode.
pub type Publication = BTreeMap<AggregationMode, usize>;

/// Aggregate `scaled` in every mode, rescale, and replace the stored rows
/// selected by `scope`. Then apply poll scaling to `scaled` itself.
#[allow(clippy::too_many_arguments)]
pub fn publish_global_scores<S, A, P>(
    store: &S,
    aggregator: &A,
    poll_scaling: &P,
    poll: &str,
    criterion: &str,
    scaled: &mut [ScaledIndividualScore],
    scope: ReplaceScope<'_>,
) -> Result<Publication, StorageError>
where
    S: ScoreSink + ?Sized,
    A: GlobalAggregator + ?Sized,
    P: PollScaling + ?Sized,
{
    let mut publication = Publication::new();
    for mode in AggregationMode::ALL {
        let mut rows: Vec<GlobalEntityScore> = aggregator
            .aggregate(scaled, mode)
            .into_iter()
            .map(|aggregate| GlobalEntityScore::tagged(aggregate, criterion, mode))
            .collect();
        poll_scaling.rescale_global(poll, &mut rows);
        store.replace_global_scores(&rows, criterion, mode, scope)?;
        publication.insert(mode, rows.len());
    }
    poll_scaling.rescale_individual(poll, scaled);
    Ok(publication)
}

/// Rebuild every published score of `criterion` from all stored individual
/// scores. After the call the stored rows of each mode equal the
/// aggregator's output exactly.
pub fn republish_criterion<S, A, P>(
    store: &S,
    aggregator: &A,
    poll_scaling: &P,
    poll: &str,
    criterion: &str,
) -> Result<Publication, StorageError>
where
    S: ScoreStore + ?Sized,
    A: GlobalAggregator + ?Sized,
    P: PollScaling + ?Sized,
{
    let rows = store.individual_scores(&IndividualScoreFilter::criterion(criterion))?;
    let mut scaled = scale_individual_scores(store, criterion, rows)?;
    publish_global_scores(
        store,
        aggregator,
        poll_scaling,
        poll,
        criterion,
        &mut scaled,
        ReplaceScope::Criterion,
    )
}
