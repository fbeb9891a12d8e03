use kdam::{Bar, BarExt};
use rayon::prelude::*;

use super::{conflate_reference, ConflationSummary, PartitionSink, ReferenceConflation, ReferenceProvider};
use crate::{
    config::ConflationConfiguration,
    model::{matches::SourceId, ConflationError},
    stream::{AggregatedReferenceMatches, MatchAggregator, MatchSource},
};

/// conflates every reference line that any source has matches for.
pub struct ConflationBatch<'a, P: ReferenceProvider> {
    config: &'a ConflationConfiguration,
    provider: &'a P,
}

impl<'a, P: ReferenceProvider> ConflationBatch<'a, P> {
    pub fn new(config: &'a ConflationConfiguration, provider: &'a P) -> Self {
        Self { config, provider }
    }

    /// merges the source streams by reference line and conflates each line, writing
    /// partitions to `sink` in reference id order.
    ///
    /// lines are gathered into batches of `batch_size` and each batch is conflated on
    /// the rayon pool when `parallelize` is set. a failure confined to one reference
    /// line is logged and counted in the summary; any other failure stops the run.
    pub fn run<S: PartitionSink>(
        &self,
        sources: Vec<(SourceId, MatchSource)>,
        sink: &mut S,
    ) -> Result<ConflationSummary, ConflationError> {
        self.config.validate()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                ConflationError::InternalError(format!(
                    "failure creating async rust tokio runtime: {e}"
                ))
            })?;

        log::info!(
            "conflating matches from {} sources: {}",
            sources.len(),
            sources.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>().join(", ")
        );
        let mut aggregator = runtime.block_on(async {
            MatchAggregator::spawn(
                sources,
                self.config.channel_capacity,
                self.config.source_timeout(),
            )
        });
        let mut bar = Bar::builder()
            .desc("conflate reference lines")
            .unit(" refs")
            .build()
            .map_err(ConflationError::InternalError)?;

        let mut summary = ConflationSummary::default();
        let mut exhausted = false;
        while !exhausted {
            let mut batch: Vec<AggregatedReferenceMatches> =
                Vec::with_capacity(self.config.batch_size);
            while batch.len() < self.config.batch_size {
                match runtime.block_on(aggregator.next()) {
                    Some(group) => batch.push(group?),
                    None => {
                        exhausted = true;
                        break;
                    }
                }
            }

            let results: Vec<Result<Option<ReferenceConflation>, ConflationError>> =
                if self.config.parallelize {
                    batch.par_iter().map(|g| self.conflate_group(g)).collect()
                } else {
                    batch.iter().map(|g| self.conflate_group(g)).collect()
                };

            for (group, result) in batch.iter().zip(results) {
                match result {
                    Ok(Some(conflation)) => {
                        sink.write_partitions(&conflation.reference_id, &conflation.partitions)?;
                        summary.references_conflated += 1;
                        summary.partitions_written += conflation.partitions.len();
                        summary.segments_skipped += conflation.segments_skipped;
                        summary.intervals_dropped += conflation.intervals_dropped;
                    }
                    Ok(None) => {
                        log::warn!(
                            "reference '{}' not found, skipping {} matches",
                            group.reference_id,
                            group.len()
                        );
                        summary.missing_references += 1;
                    }
                    Err(e) if e.is_unit_local() => {
                        log::warn!("skipping reference '{}': {e}", group.reference_id);
                        summary.record_failure(&e);
                    }
                    Err(e) => {
                        log::error!("conflation of reference '{}' failed: {e}", group.reference_id);
                        return Err(e);
                    }
                }
            }
            let _ = bar.update(batch.len());
        }
        eprintln!();
        sink.finish()?;

        log::info!(
            "conflated {} reference lines into {} partitions ({} missing, {} failed)",
            summary.references_conflated,
            summary.partitions_written,
            summary.missing_references,
            summary.failure_count()
        );
        Ok(summary)
    }

    fn conflate_group(
        &self,
        group: &AggregatedReferenceMatches,
    ) -> Result<Option<ReferenceConflation>, ConflationError> {
        match self.provider.get_reference(&group.reference_id)? {
            None => Ok(None),
            Some(reference) => conflate_reference(&reference, group, self.config).map(Some),
        }
    }
}
